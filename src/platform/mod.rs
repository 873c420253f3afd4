//! Platform bindings
//!
//! The simulation is host-agnostic; this layer adapts it to a browser:
//! - Wall clock for hold timing
//! - Pointer events
//! - JSON hand-off of render frames and events to the page

#[cfg(target_arch = "wasm32")]
pub mod web;
