//! Platform Hop entry point
//!
//! The browser build is driven from `platform::web`. Natively this runs a
//! headless autopilot that aims every jump and reports how far it got.
//!
//! Usage: `platform-hop [seed] [jumps] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
use platform_hop::Tuning;
#[cfg(not(target_arch = "wasm32"))]
use platform_hop::consts::FRAME_MS;
#[cfg(not(target_arch = "wasm32"))]
use platform_hop::sim::{
    FrameRecorder, GameEvent, GameSession, LandingOutcome, PlatformPath, hold_ms_for_distance,
};

/// Frames to give up after if a jump never resolves
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES_PER_JUMP: u32 = 5_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let jumps: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(20);
    let tuning = match args.next() {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    log::info!("Platform Hop (native) autopilot, seed {} for {} jumps", seed, jumps);
    let path = PlatformPath::seeded(seed, tuning.spawn.clone());
    let mut session = GameSession::new(tuning, path, FrameRecorder::new());

    let mut clock_ms = 0.0_f64;
    for n in 1..=jumps {
        let Some(distance) = session.distance_to_next() else {
            println!("Path ended after {} jumps", session.jumps());
            break;
        };
        let hold_ms = hold_ms_for_distance(distance, session.tuning());

        session.pointer_down(clock_ms);
        let release_at = clock_ms + hold_ms;
        while clock_ms + (FRAME_MS as f64) <= release_at {
            clock_ms += FRAME_MS as f64;
            session.frame(FRAME_MS);
        }
        session.pointer_up(release_at);

        let mut outcome = None;
        let mut frames = 0;
        while frames < MAX_FRAMES_PER_JUMP && !(outcome.is_some() && session.is_settled()) {
            clock_ms += FRAME_MS as f64;
            session.frame(FRAME_MS);
            frames += 1;
            for event in session.drain_events() {
                match event {
                    GameEvent::Landed(o) => outcome = Some(o),
                    GameEvent::PlatformSpawned(p) => {
                        log::debug!("Platform {} at {:?}", p.id, p.position)
                    }
                    _ => {}
                }
            }
        }

        match outcome {
            Some(LandingOutcome::Safe) => {
                println!("Jump {:>3}: {:>6.1} away, held {:>6.1} ms, safe", n, distance, hold_ms)
            }
            Some(other) => {
                println!(
                    "Jump {:>3}: {:>6.1} away, held {:>6.1} ms, {:?}",
                    n, distance, hold_ms, other
                );
                break;
            }
            None => {
                log::warn!("Jump {} did not resolve in {} frames", n, MAX_FRAMES_PER_JUMP);
                break;
            }
        }
    }

    let frame = session.snapshot();
    println!(
        "\n{} safe jumps, {} renders, character at {:?}, camera looking at {:?}",
        session.jumps(),
        session.scene().renders,
        frame.character_position,
        frame.camera.look_at
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(Tuning::from_json(&json)?)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
