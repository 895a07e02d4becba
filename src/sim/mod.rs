//! Session simulation module
//!
//! All gameplay rules live here. This module must stay deterministic:
//! - Time is passed in explicitly (milliseconds)
//! - Seeded RNG only
//! - Stable iteration order (targets keyed by id)
//! - No rendering, audio or storage dependencies

pub mod clock;
pub mod placement;
pub mod state;
pub mod tick;
pub mod timer;

pub use clock::{SessionClock, remaining_ms};
pub use placement::{ArenaBounds, PlacementFailed, choose_kind, is_clear, place};
pub use state::{Interaction, Outcome, SessionPhase, SessionState, Target, TargetKind};
pub use tick::{Resolution, resolve_action, resolve_decay, spawn_tick};
pub use timer::TimerQueue;
