//! Game settings and preferences
//!
//! Persisted separately from the score ledger, used to prefill the menu.

use serde::{Deserialize, Serialize};

use crate::consts::{DURATION_STEP_SECS, MAX_DURATION_SECS, MIN_DURATION_SECS};
use crate::difficulty::Difficulty;
use crate::persistence::KeyValueStore;

/// Last-used session settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    /// Session length in seconds
    #[serde(rename = "duration")]
    pub duration_secs: u32,
    pub difficulty: Difficulty,
    /// Cue volume (0.0 - 1.0)
    pub volume: f32,
    /// Spawn no-go distractors
    pub distractor_enabled: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            difficulty: Difficulty::Normal,
            volume: 0.5,
            distractor_enabled: true,
        }
    }
}

impl GameSettings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "attention-game-settings";

    /// Session length in milliseconds
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.duration_secs) * 1000
    }

    /// Snap duration onto the selectable steps and clamp volume to [0, 1]
    pub fn sanitized(mut self) -> Self {
        let clamped = self.duration_secs.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS);
        let steps = (clamped - MIN_DURATION_SECS + DURATION_STEP_SECS / 2) / DURATION_STEP_SECS;
        self.duration_secs = MIN_DURATION_SECS + steps * DURATION_STEP_SECS;

        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            Self::default().volume
        };
        self
    }

    /// Load settings, falling back to defaults on absent or corrupt data
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<GameSettings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Corrupt settings, using defaults: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read settings: {e}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings (failures are logged and dropped)
    pub fn save<S: KeyValueStore>(&self, store: &S) {
        let saved = serde_json::to_string(self)
            .map_err(crate::persistence::StoreError::from)
            .and_then(|json| store.set(Self::STORAGE_KEY, &json));
        match saved {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {e}"),
        }
    }
}
