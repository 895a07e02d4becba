//! Session state and core simulation types

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Whether a target should be tapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// Tap for points
    Go,
    /// Distractor - tapping costs points
    NoGo,
}

impl TargetKind {
    pub fn opposite(&self) -> TargetKind {
        match self {
            TargetKind::Go => TargetKind::NoGo,
            TargetKind::NoGo => TargetKind::Go,
        }
    }
}

/// A live target. Never mutated after spawn; removal is its only transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub id: u32,
    /// Top-left corner in arena-local pixels
    pub pos: Vec2,
    pub kind: TargetKind,
    /// Wall-clock spawn time (ms)
    pub spawned_at_ms: u64,
}

/// How an interaction resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// Go target tapped
    Hit,
    /// No-go target tapped
    WrongHit,
    /// Go target decayed untouched
    Timeout,
}

/// One resolved interaction in the session history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub target_id: u32,
    pub pos: Vec2,
    pub kind: TargetKind,
    pub outcome: Outcome,
    /// Time from spawn to resolution (decay time for timeouts)
    pub reaction_ms: u64,
}

impl Interaction {
    pub fn is_timeout(&self) -> bool {
        self.outcome == Outcome::Timeout
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Menu, no session running
    #[default]
    Idle,
    /// Targets spawning, clock counting down
    Running,
    /// Clock expired or stopped; state frozen for the summary
    Ended,
}

/// Mutable state of one session, exclusively owned by the controller
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// Never negative; penalties floor at zero
    pub score: u32,
    pub time_remaining_ms: u64,
    pub started_at_ms: u64,
    /// Live targets keyed by id
    pub targets: BTreeMap<u32, Target>,
    /// Append-only record of resolved interactions
    pub history: Vec<Interaction>,
    /// Next target id
    next_id: u32,
}

impl SessionState {
    /// Fresh running state
    pub fn started(now_ms: u64, duration_ms: u64) -> Self {
        Self {
            phase: SessionPhase::Running,
            time_remaining_ms: duration_ms,
            started_at_ms: now_ms,
            ..Self::default()
        }
    }

    /// Allocate a new target id
    pub fn next_target_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Remove a live target; None if it was already resolved
    pub fn take_target(&mut self, id: u32) -> Option<Target> {
        self.targets.remove(&id)
    }

    /// Count interactions with the given outcome
    pub fn count(&self, outcome: Outcome) -> usize {
        self.history.iter().filter(|i| i.outcome == outcome).count()
    }
}
