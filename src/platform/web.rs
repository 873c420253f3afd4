//! Browser entry point
//!
//! The page owns the renderer and the animation frame loop. It forwards
//! pointer events, calls `frame` once per `requestAnimationFrame`, and draws
//! the JSON it gets back.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::Tuning;
use crate::sim::{GameSession, PlatformPath, RenderFrame, Scene, SceneObject};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Platform Hop starting...");
}

/// Milliseconds from the page's high resolution clock
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Scene adds and removes since the last poll
#[derive(Debug, Default, Serialize)]
struct SceneChanges {
    added: Vec<SceneObject>,
    removed: Vec<SceneObject>,
}

/// Scene that buffers everything for the page to pick up
#[derive(Debug, Default)]
struct JsonScene {
    last: Option<RenderFrame>,
    changes: SceneChanges,
}

impl Scene for JsonScene {
    fn render(&mut self, frame: &RenderFrame) {
        self.last = Some(frame.clone());
    }

    fn add(&mut self, object: SceneObject) {
        self.changes.added.push(object);
    }

    fn remove(&mut self, object: SceneObject) {
        self.changes.removed.push(object);
    }
}

#[wasm_bindgen]
pub struct WebGame {
    session: GameSession<PlatformPath, JsonScene>,
}

#[wasm_bindgen]
impl WebGame {
    /// New game from `seed`, with optional tuning JSON
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, tuning_json: Option<String>) -> Result<WebGame, JsValue> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(to_js)?,
            None => Tuning::default(),
        };
        let path = PlatformPath::seeded(seed, tuning.spawn.clone());
        Ok(Self {
            session: GameSession::new(tuning, path, JsonScene::default()),
        })
    }

    pub fn pointer_down(&mut self) -> bool {
        self.session.pointer_down(now_ms())
    }

    pub fn pointer_up(&mut self) -> bool {
        self.session.pointer_up(now_ms())
    }

    /// Advance one display refresh; returns the render frame as JSON
    pub fn frame(&mut self, dt_ms: f32) -> Result<String, JsValue> {
        self.session.frame(dt_ms);
        serde_json::to_string(&self.session.snapshot()).map_err(to_js)
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.drain_events()).map_err(to_js)
    }

    /// Scene objects to add and remove, as JSON
    pub fn scene_changes(&mut self) -> Result<String, JsValue> {
        let changes = std::mem::take(&mut self.session.scene_mut().changes);
        serde_json::to_string(&changes).map_err(to_js)
    }

    /// Start over on a new path
    pub fn restart(&mut self, seed: u64) {
        let path = PlatformPath::seeded(seed, self.session.tuning().spawn.clone());
        self.session.reset(path);
    }

    pub fn jumps(&self) -> u32 {
        self.session.jumps()
    }

    pub fn is_dead(&self) -> bool {
        self.session.character().is_dead()
    }
}
