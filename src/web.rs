//! Browser bindings
//!
//! The page owns rendering and input; it forwards taps and animation frames
//! here and draws from the JSON snapshot.

use wasm_bindgen::prelude::*;

use crate::audio::WebAudioCues;
use crate::difficulty::Difficulty;
use crate::persistence::{KeyValueStore, MemoryStore};
use crate::platform::{self, LocalStorage};
use crate::session::SessionController;
use crate::settings::GameSettings;
use crate::sim::ArenaBounds;

fn open_store() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{e}, scores will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Failed to serialize: {e}");
        "null".to_string()
    })
}

#[wasm_bindgen]
pub struct WebSession {
    controller: SessionController<Box<dyn KeyValueStore>, WebAudioCues>,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebSession {
        let seed = platform::now_ms() ^ (js_sys::Math::random() * u32::MAX as f64) as u64;
        Self {
            controller: SessionController::new(open_store(), WebAudioCues::new(), seed),
        }
    }

    /// Measured play field in CSS pixels
    #[wasm_bindgen(js_name = setArena)]
    pub fn set_arena(&mut self, width: f32, height: f32, top_margin: f32) {
        self.controller
            .set_arena(Some(ArenaBounds::new(width, height).with_top_margin(top_margin)));
    }

    #[wasm_bindgen(js_name = clearArena)]
    pub fn clear_arena(&mut self) {
        self.controller.set_arena(None);
    }

    /// Apply menu settings. Returns false while a session is running.
    #[wasm_bindgen(js_name = updateSettings)]
    pub fn update_settings(
        &mut self,
        duration_secs: u32,
        difficulty: &str,
        volume: f32,
        distractor_enabled: bool,
    ) -> bool {
        let difficulty = Difficulty::from_str(difficulty).unwrap_or_else(|| {
            log::warn!("Unknown difficulty {difficulty:?}, using default");
            Difficulty::default()
        });
        self.controller.update_settings(GameSettings {
            duration_secs,
            difficulty,
            volume,
            distractor_enabled,
        })
    }

    /// Current settings as JSON
    pub fn settings(&self) -> String {
        to_json(self.controller.settings())
    }

    pub fn start(&mut self) {
        self.controller.start(platform::now_ms());
    }

    pub fn stop(&mut self) {
        self.controller.stop(platform::now_ms());
    }

    #[wasm_bindgen(js_name = returnToMenu)]
    pub fn return_to_menu(&mut self) {
        self.controller.return_to_menu(platform::now_ms());
    }

    /// Drive timers; call once per animation frame
    pub fn advance(&mut self) {
        self.controller.advance(platform::now_ms());
    }

    /// Tap on a target. Returns the outcome name, or undefined if nothing resolved.
    pub fn click(&mut self, target_id: u32) -> Option<String> {
        self.controller
            .click(target_id, platform::now_ms())
            .map(|outcome| to_json(&outcome).trim_matches('"').to_string())
    }

    #[wasm_bindgen(js_name = backgroundClick)]
    pub fn background_click(&self) {
        self.controller.background_click();
    }

    #[wasm_bindgen(js_name = displayedBest)]
    pub fn displayed_best(&self) -> u32 {
        self.controller.displayed_best()
    }

    /// Frame snapshot as JSON
    pub fn snapshot(&self) -> String {
        to_json(&self.controller.snapshot(platform::now_ms()))
    }

    /// Events since the last call, as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> String {
        to_json(&self.controller.drain_events())
    }

    /// Results of the last session as JSON (null before one has ended)
    pub fn summary(&self) -> String {
        to_json(&self.controller.summary())
    }
}

impl Default for WebSession {
    fn default() -> Self {
        Self::new()
    }
}
