//! Session controller
//!
//! Owns the session state, the timer queue and the collaborators (store,
//! audio). Hosts drive it with wall-clock timestamps:
//! - `advance(now)` every frame (or at least every 100 ms)
//! - `click(id, now)` on player taps
//! - `set_arena(..)` whenever the play field is measured
//!
//! idle -> running (start) -> ended (clock expiry or stop) -> idle / running

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::audio::AudioCues;
use crate::difficulty::{Difficulty, DifficultyConfig};
use crate::highscores::ScoreStore;
use crate::persistence::KeyValueStore;
use crate::settings::GameSettings;
use crate::sim::{
    ArenaBounds, Interaction, Outcome, Resolution, SessionClock, SessionPhase, SessionState, Target,
    TimerQueue, resolve_action, resolve_decay, spawn_tick,
};
use crate::stats::SessionSummary;

/// Timed events of a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    ClockPoll,
    SpawnTick,
    Decay(u32),
}

/// Notifications for the rendering host, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    Started {
        difficulty: Difficulty,
        duration_ms: u64,
    },
    TargetSpawned(Target),
    /// `outcome` is None for a no-go target that decayed untouched
    TargetResolved {
        id: u32,
        outcome: Option<Outcome>,
    },
    Ended {
        final_score: u32,
        best_score: u32,
    },
}

/// Per-frame view for the rendering host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub score: u32,
    pub time_remaining_ms: u64,
    pub target_diameter_px: f32,
    pub best_score: u32,
    pub targets: Vec<Target>,
}

/// Settings frozen for the lifetime of one session
#[derive(Debug, Clone, Copy)]
struct ActiveSession {
    difficulty: Difficulty,
    config: DifficultyConfig,
    distractor_enabled: bool,
    volume: f32,
    clock: SessionClock,
}

pub struct SessionController<S, A> {
    store: S,
    audio: A,
    settings: GameSettings,
    state: SessionState,
    timers: TimerQueue<TimerEvent>,
    active: Option<ActiveSession>,
    arena: Option<ArenaBounds>,
    rng: Pcg32,
    seed: u64,
    sessions_started: u64,
    displayed_best: u32,
    events: Vec<SessionEvent>,
    calendar: fn() -> NaiveDate,
}

impl<S: KeyValueStore, A: AudioCues> SessionController<S, A> {
    /// Create a controller in the idle state, prefilled from stored settings
    pub fn new(store: S, audio: A, seed: u64) -> Self {
        let settings = GameSettings::load(&store);
        let mut controller = Self {
            store,
            audio,
            settings,
            state: SessionState::default(),
            timers: TimerQueue::new(),
            active: None,
            arena: None,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            sessions_started: 0,
            displayed_best: 0,
            events: Vec::new(),
            calendar: crate::platform::today,
        };
        controller.refresh_best();
        controller
    }

    /// Override the source of "today" for the daily ledger
    pub fn with_calendar(mut self, calendar: fn() -> NaiveDate) -> Self {
        self.calendar = calendar;
        self.refresh_best();
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &[Interaction] {
        &self.state.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Best score shown on the menu/results screen
    pub fn displayed_best(&self) -> u32 {
        self.displayed_best
    }

    /// Host reports the measured play field (None while layout is pending)
    pub fn set_arena(&mut self, arena: Option<ArenaBounds>) {
        self.arena = arena;
    }

    /// Change settings from the menu. Rejected while a session is running.
    pub fn update_settings(&mut self, settings: GameSettings) -> bool {
        if self.state.is_running() {
            log::warn!("Ignoring settings change during a running session");
            return false;
        }
        self.settings = settings.sanitized();
        self.settings.save(&self.store);
        self.refresh_best();
        true
    }

    /// Start a new session (a running one is stopped first)
    pub fn start(&mut self, now_ms: u64) {
        if self.state.is_running() {
            self.stop(now_ms);
        }

        self.sessions_started += 1;
        let session_seed = self
            .seed
            .wrapping_add(self.sessions_started.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.rng = Pcg32::seed_from_u64(session_seed);

        let settings = self.settings;
        let config = settings.difficulty.config();
        let clock = SessionClock::new(now_ms, settings.duration_ms());
        self.active = Some(ActiveSession {
            difficulty: settings.difficulty,
            config,
            distractor_enabled: settings.distractor_enabled,
            volume: settings.volume,
            clock,
        });

        self.state = SessionState::started(now_ms, clock.duration_ms);
        self.timers.clear();
        self.timers.schedule(clock.next_poll(now_ms), TimerEvent::ClockPoll);
        self.timers
            .schedule(now_ms + config.spawn_interval_ms, TimerEvent::SpawnTick);

        log::info!(
            "Session started: difficulty={}, duration={}s, distractors={}, seed={session_seed}",
            settings.difficulty,
            settings.duration_secs,
            settings.distractor_enabled
        );
        self.events.push(SessionEvent::Started {
            difficulty: settings.difficulty,
            duration_ms: clock.duration_ms,
        });
    }

    /// Stop the running session early; it ends and is scored as usual
    pub fn stop(&mut self, now_ms: u64) {
        self.advance(now_ms);
        self.finish(now_ms);
    }

    /// Go back to the menu (stopping a running session). The finished
    /// session is discarded; the menu shows an empty field.
    pub fn return_to_menu(&mut self, now_ms: u64) {
        if self.state.is_running() {
            self.stop(now_ms);
        }
        self.timers.clear();
        self.active = None;
        self.state = SessionState::default();
        self.refresh_best();
    }

    /// Process every timer due at or before `now_ms`, in deadline order
    pub fn advance(&mut self, now_ms: u64) {
        while let Some((deadline, event)) = self.timers.pop_due(now_ms) {
            self.handle_timer(deadline, event);
        }
        if let (true, Some(active)) = (self.state.is_running(), self.active) {
            self.state.time_remaining_ms = active.clock.remaining(now_ms);
        }
    }

    /// Player tapped a target. Returns the outcome, or None if the tap
    /// resolved nothing (target gone, session not running).
    pub fn click(&mut self, target_id: u32, now_ms: u64) -> Option<Outcome> {
        self.advance(now_ms);
        let active = self.active?;

        let interaction = resolve_action(&mut self.state, target_id, now_ms)?;
        match interaction.outcome {
            Outcome::Hit => self.audio.play_success(active.volume),
            _ => self.audio.play_miss(active.volume),
        }
        self.events.push(SessionEvent::TargetResolved {
            id: target_id,
            outcome: Some(interaction.outcome),
        });
        Some(interaction.outcome)
    }

    /// Tap on empty space: no penalty, no record
    pub fn background_click(&self) {}

    /// Per-frame view for rendering
    pub fn snapshot(&self, now_ms: u64) -> Snapshot {
        let time_remaining_ms = match (self.state.phase, self.active) {
            (SessionPhase::Running, Some(active)) => active.clock.remaining(now_ms),
            (SessionPhase::Idle, _) => self.settings.duration_ms(),
            _ => self.state.time_remaining_ms,
        };
        let diameter = self
            .active
            .map(|a| a.config)
            .unwrap_or_else(|| self.settings.difficulty.config())
            .target_diameter_px;

        Snapshot {
            phase: self.state.phase,
            score: self.state.score,
            time_remaining_ms,
            target_diameter_px: diameter,
            best_score: self.displayed_best,
            targets: self.state.targets.values().copied().collect(),
        }
    }

    /// Results of the last session, once it has ended
    pub fn summary(&self) -> Option<SessionSummary> {
        if self.state.phase != SessionPhase::Ended {
            return None;
        }
        let active = self.active?;
        Some(SessionSummary::new(
            active.difficulty,
            active.distractor_enabled,
            self.state.score,
            self.displayed_best,
            &self.state.history,
        ))
    }

    /// Take queued notifications
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn handle_timer(&mut self, deadline: u64, event: TimerEvent) {
        let Some(active) = self.active else { return };
        if !self.state.is_running() {
            return;
        }

        match event {
            TimerEvent::ClockPoll => {
                let remaining = active.clock.remaining(deadline);
                self.state.time_remaining_ms = remaining;
                if remaining == 0 {
                    self.finish(deadline);
                } else {
                    self.timers
                        .schedule(active.clock.next_poll(deadline), TimerEvent::ClockPoll);
                }
            }
            TimerEvent::SpawnTick => {
                if active.clock.is_expired(deadline) {
                    return;
                }
                let spawned = spawn_tick(
                    &mut self.state,
                    &mut self.rng,
                    &active.config,
                    self.arena.as_ref(),
                    active.distractor_enabled,
                    deadline,
                );
                for target in spawned {
                    self.timers.schedule(
                        target.spawned_at_ms + active.config.decay_time_ms,
                        TimerEvent::Decay(target.id),
                    );
                    self.events.push(SessionEvent::TargetSpawned(target));
                }
                self.timers.schedule(
                    deadline + active.config.spawn_interval_ms,
                    TimerEvent::SpawnTick,
                );
            }
            TimerEvent::Decay(id) => {
                if let Some(resolution) =
                    resolve_decay(&mut self.state, id, active.config.decay_time_ms)
                {
                    self.events.push(SessionEvent::TargetResolved {
                        id: resolution.target_id(),
                        outcome: resolution.outcome(),
                    });
                    if let Resolution::Expired(target) = resolution {
                        log::trace!("Distractor {} expired", target.id);
                    }
                }
            }
        }
    }

    /// running -> ended. Idempotent.
    fn finish(&mut self, now_ms: u64) {
        if !self.state.is_running() {
            return;
        }
        let Some(active) = self.active else { return };

        // Hard boundary: nothing from this session fires after this point
        self.timers.clear();
        self.state.phase = SessionPhase::Ended;
        self.state.time_remaining_ms = active.clock.remaining(now_ms);

        let today = (self.calendar)();
        let scores = ScoreStore::new(&self.store);
        scores.record_score(
            today,
            active.difficulty,
            active.distractor_enabled,
            self.state.score,
        );
        self.displayed_best = scores
            .best_score(today, active.difficulty, active.distractor_enabled)
            .max(self.state.score);

        log::info!(
            "Session ended: score={}, hits={}, wrong={}, timeouts={}",
            self.state.score,
            self.state.count(Outcome::Hit),
            self.state.count(Outcome::WrongHit),
            self.state.count(Outcome::Timeout)
        );
        self.events.push(SessionEvent::Ended {
            final_score: self.state.score,
            best_score: self.displayed_best,
        });
    }

    /// Reload the best score for the selected difficulty/mode
    fn refresh_best(&mut self) {
        let today = (self.calendar)();
        self.displayed_best = ScoreStore::new(&self.store).best_score(
            today,
            self.settings.difficulty,
            self.settings.distractor_enabled,
        );
    }
}
