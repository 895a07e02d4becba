//! Focus Tap - a go/no-go attention training game
//!
//! Core modules:
//! - `sim`: Session engine (placement, clock, timers, spawn/decay/scoring)
//! - `session`: Session controller wiring the engine to storage and audio
//! - `difficulty`: Static per-difficulty tuning catalog
//! - `highscores`: Daily best-score ledger
//! - `settings`: Last-used game settings
//! - `stats`: End-of-session summary
//! - `audio`: Success/miss cue collaborator
//! - `persistence`: Key-value store collaborator
//! - `platform`: Browser/native platform abstraction

pub mod audio;
pub mod difficulty;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod stats;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use audio::{AudioCues, SilentAudio};
pub use difficulty::{Difficulty, DifficultyConfig};
pub use highscores::{ScoreRecord, ScoreStore};
pub use persistence::{KeyValueStore, MemoryStore, StoreError};
#[cfg(not(target_arch = "wasm32"))]
pub use persistence::FileStore;
pub use session::{SessionController, SessionEvent, Snapshot};
pub use settings::GameSettings;
pub use stats::SessionSummary;

/// Game configuration constants
pub mod consts {
    /// Gap kept between a target and the arena edges (px)
    pub const ARENA_PADDING: f32 = 20.0;
    /// Default height of the heads-up overlay band at the top of the arena (px)
    pub const DEFAULT_HUD_MARGIN: f32 = 120.0;
    /// Candidate positions tried before a spawn unit is skipped
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 15;
    /// Minimum distance between opposite-kind targets, in target diameters
    pub const SEPARATION_FACTOR: f32 = 1.2;

    /// Points for tapping a go target
    pub const HIT_REWARD: u32 = 100;
    /// Points lost for tapping a no-go target (score floors at zero)
    pub const WRONG_HIT_PENALTY: u32 = 50;

    /// Session clock poll resolution (ms)
    pub const CLOCK_POLL_MS: u64 = 100;

    /// Selectable session durations (seconds)
    pub const MIN_DURATION_SECS: u32 = 30;
    pub const MAX_DURATION_SECS: u32 = 180;
    pub const DURATION_STEP_SECS: u32 = 30;
}
