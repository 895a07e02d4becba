//! Session event handlers
//!
//! Each handler applies one timed or player event to the session state:
//! - `spawn_tick`: place this tick's targets
//! - `resolve_action`: player tapped a target
//! - `resolve_decay`: a target's lifetime ran out

use glam::Vec2;
use rand::Rng;

use super::placement::{ArenaBounds, choose_kind, place};
use super::state::{Interaction, Outcome, SessionState, Target, TargetKind};
use crate::consts::{HIT_REWARD, WRONG_HIT_PENALTY};
use crate::difficulty::DifficultyConfig;

/// What happened to a target that left the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Recorded in history (hit, wrong hit or go timeout)
    Resolved(Interaction),
    /// No-go target decayed; ignoring it was correct, nothing recorded
    Expired(Target),
}

impl Resolution {
    pub fn target_id(&self) -> u32 {
        match self {
            Resolution::Resolved(i) => i.target_id,
            Resolution::Expired(t) => t.id,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Resolution::Resolved(i) => Some(i.outcome),
            Resolution::Expired(_) => None,
        }
    }
}

/// Run one spawn tick: try `simultaneous_spawns` placements and commit the
/// successful ones. Returns the committed targets (caller schedules decay).
///
/// Targets accepted earlier in the same tick count as obstacles for later
/// ones, so the whole batch honours the cross-kind distance rule. Nothing is
/// inserted into the live set until the batch is complete.
pub fn spawn_tick<R: Rng>(
    state: &mut SessionState,
    rng: &mut R,
    config: &DifficultyConfig,
    arena: Option<&ArenaBounds>,
    distractor_enabled: bool,
    now_ms: u64,
) -> Vec<Target> {
    if !state.is_running() {
        return Vec::new();
    }
    let Some(arena) = arena else {
        log::debug!("Arena not measured yet, skipping spawn tick");
        return Vec::new();
    };

    let diameter = config.target_diameter_px;
    let mut obstacles: Vec<(Vec2, TargetKind)> =
        state.targets.values().map(|t| (t.pos, t.kind)).collect();
    let mut accepted: Vec<(Vec2, TargetKind)> = Vec::new();

    for _ in 0..config.simultaneous_spawns {
        let kind = choose_kind(rng, distractor_enabled, config.distractor_chance);
        match place(rng, arena, diameter, kind, &obstacles) {
            Ok(pos) => {
                obstacles.push((pos, kind));
                accepted.push((pos, kind));
            }
            Err(e) => log::debug!("Skipping {kind:?} spawn: {e}"),
        }
    }

    accepted
        .into_iter()
        .map(|(pos, kind)| {
            let target = Target {
                id: state.next_target_id(),
                pos,
                kind,
                spawned_at_ms: now_ms,
            };
            state.targets.insert(target.id, target);
            target
        })
        .collect()
}

/// Resolve a player tap. No-op (None) if the target is already gone.
pub fn resolve_action(state: &mut SessionState, target_id: u32, now_ms: u64) -> Option<Interaction> {
    if !state.is_running() {
        return None;
    }
    let target = state.take_target(target_id)?;

    let outcome = match target.kind {
        TargetKind::Go => {
            state.score = state.score.saturating_add(HIT_REWARD);
            Outcome::Hit
        }
        TargetKind::NoGo => {
            state.score = state.score.saturating_sub(WRONG_HIT_PENALTY);
            Outcome::WrongHit
        }
    };

    let interaction = Interaction {
        target_id,
        pos: target.pos,
        kind: target.kind,
        outcome,
        reaction_ms: now_ms.saturating_sub(target.spawned_at_ms),
    };
    state.history.push(interaction);
    Some(interaction)
}

/// Resolve a decay deadline. No-op (None) if the target was already tapped.
/// Go targets are recorded as timeouts; score is unaffected either way.
pub fn resolve_decay(state: &mut SessionState, target_id: u32, decay_time_ms: u64) -> Option<Resolution> {
    if !state.is_running() {
        return None;
    }
    let target = state.take_target(target_id)?;

    match target.kind {
        TargetKind::Go => {
            let interaction = Interaction {
                target_id,
                pos: target.pos,
                kind: target.kind,
                outcome: Outcome::Timeout,
                reaction_ms: decay_time_ms,
            };
            state.history.push(interaction);
            Some(Resolution::Resolved(interaction))
        }
        TargetKind::NoGo => Some(Resolution::Expired(target)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::sim::state::SessionPhase;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running() -> SessionState {
        SessionState::started(0, 60_000)
    }

    fn insert(state: &mut SessionState, kind: TargetKind, spawned_at_ms: u64) -> u32 {
        let id = state.next_target_id();
        state.targets.insert(
            id,
            Target {
                id,
                pos: Vec2::new(100.0, 200.0),
                kind,
                spawned_at_ms,
            },
        );
        id
    }

    #[test]
    fn test_hit_scores_and_records() {
        let mut state = running();
        let id = insert(&mut state, TargetKind::Go, 1_000);

        let i = resolve_action(&mut state, id, 1_350).unwrap();
        assert_eq!(i.outcome, Outcome::Hit);
        assert_eq!(i.reaction_ms, 350);
        assert_eq!(state.score, 100);
        assert!(state.targets.is_empty());
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_wrong_hit_floors_at_zero() {
        let mut state = running();
        state.score = 20;
        let id = insert(&mut state, TargetKind::NoGo, 0);

        let i = resolve_action(&mut state, id, 400).unwrap();
        assert_eq!(i.outcome, Outcome::WrongHit);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_wrong_hit_penalty() {
        let mut state = running();
        state.score = 300;
        let id = insert(&mut state, TargetKind::NoGo, 0);
        resolve_action(&mut state, id, 400);
        assert_eq!(state.score, 250);
    }

    #[test]
    fn test_double_resolution_is_noop() {
        let mut state = running();
        let id = insert(&mut state, TargetKind::Go, 0);

        assert!(resolve_action(&mut state, id, 500).is_some());
        assert!(resolve_decay(&mut state, id, 2_000).is_none());
        assert!(resolve_action(&mut state, id, 500).is_none());
        assert_eq!(state.score, 100);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_decay_before_click_wins() {
        let mut state = running();
        let id = insert(&mut state, TargetKind::Go, 0);

        assert!(resolve_decay(&mut state, id, 1_200).is_some());
        assert!(resolve_action(&mut state, id, 1_200).is_none());
        assert_eq!(state.score, 0);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_go_decay_records_timeout() {
        let mut state = running();
        let id = insert(&mut state, TargetKind::Go, 0);

        let res = resolve_decay(&mut state, id, 1_200).unwrap();
        assert_eq!(res.outcome(), Some(Outcome::Timeout));
        let record = state.history[0];
        assert!(record.is_timeout());
        assert_eq!(record.reaction_ms, 1_200);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_no_go_decay_not_recorded() {
        let mut state = running();
        let id = insert(&mut state, TargetKind::NoGo, 0);

        let res = resolve_decay(&mut state, id, 1_200).unwrap();
        assert!(matches!(res, Resolution::Expired(t) if t.id == id));
        assert!(state.targets.is_empty());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_nothing_resolves_after_end() {
        let mut state = running();
        let id = insert(&mut state, TargetKind::Go, 0);
        state.phase = SessionPhase::Ended;

        assert!(resolve_action(&mut state, id, 100).is_none());
        assert!(resolve_decay(&mut state, id, 100).is_none());
        assert_eq!(state.targets.len(), 1);
    }

    #[test]
    fn test_spawn_skipped_without_arena() {
        let mut state = running();
        let mut rng = Pcg32::seed_from_u64(1);
        let cfg = Difficulty::Normal.config();
        assert!(spawn_tick(&mut state, &mut rng, &cfg, None, true, 800).is_empty());
        assert!(state.targets.is_empty());
    }

    #[test]
    fn test_spawn_assigns_ids_and_time() {
        let mut state = running();
        let mut rng = Pcg32::seed_from_u64(1);
        let cfg = Difficulty::Expert.config();
        let arena = ArenaBounds::new(1280.0, 800.0);

        let first = spawn_tick(&mut state, &mut rng, &cfg, Some(&arena), false, 600);
        let second = spawn_tick(&mut state, &mut rng, &cfg, Some(&arena), false, 1_200);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        let ids: Vec<u32> = first.iter().chain(&second).map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(first.iter().all(|t| t.spawned_at_ms == 600));
        assert_eq!(state.targets.len(), 4);
    }

    #[test]
    fn test_simultaneous_spawns_keep_cross_kind_distance() {
        let cfg = DifficultyConfig {
            distractor_chance: 0.5,
            ..Difficulty::Expert.config()
        };
        let arena = ArenaBounds::new(600.0, 500.0);
        let min_dist = 1.2 * cfg.target_diameter_px;

        for seed in 0..50 {
            let mut state = running();
            let mut rng = Pcg32::seed_from_u64(seed);
            for tick in 1..=10 {
                spawn_tick(&mut state, &mut rng, &cfg, Some(&arena), true, tick * 600);
            }
            let live: Vec<Target> = state.targets.values().copied().collect();
            for a in &live {
                for b in &live {
                    if a.kind != b.kind {
                        assert!(a.pos.distance(b.pos) >= min_dist, "seed {seed}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_crowded_arena_skips_units() {
        let mut state = running();
        let mut rng = Pcg32::seed_from_u64(5);
        let cfg = DifficultyConfig {
            distractor_chance: 1.0,
            ..Difficulty::Expert.config()
        };
        // Single-point band: once a go target sits there, no-go cannot spawn
        let arena = ArenaBounds::new(110.0, 110.0).with_top_margin(0.0);
        insert(&mut state, TargetKind::Go, 0);
        state.targets.get_mut(&0).unwrap().pos = Vec2::new(20.0, 20.0);

        let spawned = spawn_tick(&mut state, &mut rng, &cfg, Some(&arena), true, 600);
        assert!(spawned.is_empty());
        assert_eq!(state.targets.len(), 1);
    }
}
