//! Heading from the character toward the next platform
//!
//! Headings are measured in the ground plane from the travel axis reference
//! vector: `(1, 0)` along-x, `(0, 1)` along-y. Height is ignored.

use glam::{Vec2, Vec3};

use super::state::TravelAxis;

/// Planar offset from `from` to `to`, or None when it has no length
fn planar_offset(from: Vec3, to: Vec3) -> Option<Vec2> {
    let v = (to - from).truncate();
    if v.length_squared() <= f32::EPSILON {
        log::warn!("Target directly above character, skipping heading");
        None
    } else {
        Some(v)
    }
}

/// Signed heading in (-π, π], counter-clockwise from the axis reference
///
/// Returns None when there is no target (end of path) or the target is
/// directly above the character.
pub fn heading_to(from: Vec3, target: Option<Vec3>, axis: TravelAxis) -> Option<f32> {
    let v = planar_offset(from, target?)?;
    let reference = axis.reference();
    Some(reference.perp_dot(v).atan2(reference.dot(v)))
}

/// Unsigned angle in [0, π] between the offset and the axis reference
///
/// `acos(dot / (|a|·|b|))` cannot tell mirrored targets apart; kept for
/// parity with levels tuned against it.
pub fn unsigned_heading_to(from: Vec3, target: Option<Vec3>, axis: TravelAxis) -> Option<f32> {
    let v = planar_offset(from, target?)?;
    let reference = axis.reference();
    let cos = v.dot(reference) / (v.length() * reference.length());
    Some(cos.clamp(-1.0, 1.0).acos())
}

/// Unit direction in the ground plane for a heading measured from `axis`
///
/// along-x: `(cos h, sin h)`; along-y: `(-sin h, cos h)`.
pub fn direction_for(axis: TravelAxis, heading: f32) -> Vec2 {
    let (sin, cos) = heading.sin_cos();
    match axis {
        TravelAxis::AlongX => Vec2::new(cos, sin),
        TravelAxis::AlongY => Vec2::new(-sin, cos),
    }
}
