//! Session countdown
//!
//! Remaining time is always derived from the fixed start timestamp, never
//! accumulated per tick, so scheduling jitter cannot drift the clock.

use crate::consts::CLOCK_POLL_MS;

/// Remaining time for a session, clamped to zero
pub fn remaining_ms(now_ms: u64, started_at_ms: u64, duration_ms: u64) -> u64 {
    let elapsed = now_ms.saturating_sub(started_at_ms);
    duration_ms.saturating_sub(elapsed)
}

/// Countdown for one running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    pub started_at_ms: u64,
    pub duration_ms: u64,
}

impl SessionClock {
    pub fn new(started_at_ms: u64, duration_ms: u64) -> Self {
        Self {
            started_at_ms,
            duration_ms,
        }
    }

    pub fn remaining(&self, now_ms: u64) -> u64 {
        remaining_ms(now_ms, self.started_at_ms, self.duration_ms)
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.remaining(now_ms) == 0
    }

    /// Wall-clock time at which the countdown hits zero
    pub fn ends_at(&self) -> u64 {
        self.started_at_ms.saturating_add(self.duration_ms)
    }

    /// Next poll after `at_ms`, landing exactly on expiry for the final one
    pub fn next_poll(&self, at_ms: u64) -> u64 {
        at_ms.saturating_add(CLOCK_POLL_MS).min(self.ends_at())
    }
}
