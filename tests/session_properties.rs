// Property tests for the session engine, driven through the public API.

use chrono::NaiveDate;
use proptest::prelude::*;

use focus_tap::highscores::ScoreStore;
use focus_tap::sim::{ArenaBounds, Outcome, SessionPhase, Target, remaining_ms};
use focus_tap::{Difficulty, GameSettings, MemoryStore, SessionController, SilentAudio};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
}

fn any_difficulty() -> impl Strategy<Value = Difficulty> {
    prop::sample::select(Difficulty::ALL.to_vec())
}

/// (ms to wait, which live target to tap; None = just wait)
fn actions() -> impl Strategy<Value = Vec<(u64, Option<usize>)>> {
    prop::collection::vec((0u64..900, prop::option::of(0usize..4)), 1..120)
}

fn assert_cross_kind_separation(targets: &[Target], diameter: f32) {
    for a in targets {
        for b in targets {
            if a.kind != b.kind {
                assert!(
                    a.pos.distance(b.pos) >= 1.2 * diameter,
                    "targets {} and {} too close",
                    a.id,
                    b.id
                );
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn score_matches_history_replay(
        seed in any::<u64>(),
        difficulty in any_difficulty(),
        distractors in any::<bool>(),
        steps in actions(),
    ) {
        let store = MemoryStore::new();
        let mut game = SessionController::new(&store, SilentAudio, seed).with_calendar(day);
        game.update_settings(GameSettings {
            duration_secs: 30,
            difficulty,
            volume: 0.0,
            distractor_enabled: distractors,
        });
        game.set_arena(Some(ArenaBounds::new(1024.0, 768.0)));

        let diameter = difficulty.config().target_diameter_px;
        let mut now = 0;
        game.start(now);

        for (wait, pick) in steps {
            now += wait;
            game.advance(now);
            let snapshot = game.snapshot(now);
            assert_cross_kind_separation(&snapshot.targets, diameter);

            if let Some(i) = pick {
                if let Some(target) = snapshot.targets.get(i) {
                    let id = target.id;
                    let first = game.click(id, now);
                    let score = game.score();
                    prop_assert_eq!(game.click(id, now), None);
                    prop_assert_eq!(game.score(), score);
                    if game.phase() == SessionPhase::Running {
                        prop_assert!(first.is_some());
                    }
                }
            }
        }

        let replayed = game.history().iter().fold(0u32, |score, i| match i.outcome {
            Outcome::Hit => score + 100,
            Outcome::WrongHit => score.saturating_sub(50),
            Outcome::Timeout => score,
        });
        prop_assert_eq!(game.score(), replayed);

        if !distractors {
            prop_assert!(game.history().iter().all(|i| i.outcome != Outcome::WrongHit));
        }
    }

    #[test]
    fn remaining_time_never_increases(
        start in 0u64..1_000_000,
        duration_secs in 1u64..=180,
        mut offsets in prop::collection::vec(0u64..400_000, 1..50),
    ) {
        let duration = duration_secs * 1000;
        offsets.sort_unstable();
        let mut last = duration;
        for offset in offsets {
            let remaining = remaining_ms(start + offset, start, duration);
            prop_assert!(remaining <= last);
            last = remaining;
        }
        prop_assert_eq!(remaining_ms(start + duration, start, duration), 0);
    }

    #[test]
    fn ledger_keeps_daily_max(
        scores in prop::collection::vec(0u32..10_000, 1..20),
        difficulty in any_difficulty(),
        distractors in any::<bool>(),
    ) {
        let store = MemoryStore::new();
        let ledger = ScoreStore::new(&store);
        for score in &scores {
            ledger.record_score(day(), difficulty, distractors, *score);
        }

        let best = scores.iter().copied().max().unwrap_or(0);
        prop_assert_eq!(ledger.best_score(day(), difficulty, distractors), best);
        prop_assert_eq!(ledger.best_score(day(), difficulty, !distractors), 0);
        prop_assert_eq!(ledger.load_ledger().records.len(), 1);
    }

    #[test]
    fn session_always_ends_at_duration(
        seed in any::<u64>(),
        difficulty in any_difficulty(),
        frame in 1u64..250,
    ) {
        let store = MemoryStore::new();
        let mut game = SessionController::new(&store, SilentAudio, seed).with_calendar(day);
        game.update_settings(GameSettings {
            duration_secs: 30,
            difficulty,
            ..GameSettings::default()
        });
        game.set_arena(Some(ArenaBounds::new(800.0, 600.0)));

        game.start(0);
        let mut now = 0;
        while now < 30_000 {
            prop_assert_eq!(game.phase(), SessionPhase::Running);
            now += frame;
            game.advance(now);
        }
        prop_assert_eq!(game.phase(), SessionPhase::Ended);
        prop_assert_eq!(game.snapshot(now).time_remaining_ms, 0);
        prop_assert_eq!(game.summary().map(|s| s.final_score), Some(0));
    }
}
