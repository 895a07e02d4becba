//! Focus Tap entry point
//!
//! Web: initializes logging; the page drives `WebSession`.
//! Native: plays one headless session with a scripted player and prints the
//! summary. Usage: `focus-tap [difficulty] [seed]`

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Focus Tap starting...");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    headless::run(std::env::args().skip(1).collect());
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use focus_tap::sim::{ArenaBounds, SessionPhase, TargetKind};
    use focus_tap::{Difficulty, FileStore, GameSettings, SessionController, SessionEvent, SilentAudio};

    /// Simulated frame length (ms)
    const FRAME_MS: u64 = 16;
    /// Chance the scripted player lets a go target slip
    const MISS_CHANCE: f64 = 0.1;
    /// Chance the scripted player falls for a distractor
    const IMPULSE_CHANCE: f64 = 0.15;

    pub fn run(args: Vec<String>) {
        let store = FileStore::new();
        log::info!("Data directory: {}", store.dir().display());

        let mut settings = GameSettings::load(&store);
        if let Some(name) = args.first() {
            match Difficulty::from_str(name) {
                Some(difficulty) => settings.difficulty = difficulty,
                None => log::warn!("Unknown difficulty {name:?}, keeping {}", settings.difficulty),
            }
        }
        let seed = args
            .get(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(focus_tap::platform::now_ms);

        let mut game = SessionController::new(&store, SilentAudio, seed);
        game.update_settings(settings);
        game.set_arena(Some(ArenaBounds::new(1280.0, 800.0)));

        let mut player = Pcg32::seed_from_u64(seed ^ 0xA5A5);
        let mut pending: Vec<(u64, u32)> = Vec::new();

        // Virtual clock: the session runs as fast as the CPU allows
        let mut now = focus_tap::platform::now_ms();
        game.start(now);
        println!(
            "Playing {}s on {} (distractors {})...",
            settings.duration_secs,
            settings.difficulty,
            if settings.distractor_enabled { "on" } else { "off" }
        );

        while game.phase() == SessionPhase::Running {
            now += FRAME_MS;
            game.advance(now);

            for event in game.drain_events() {
                if let SessionEvent::TargetSpawned(target) = event {
                    let reacts = match target.kind {
                        TargetKind::Go => !player.random_bool(MISS_CHANCE),
                        TargetKind::NoGo => player.random_bool(IMPULSE_CHANCE),
                    };
                    if reacts {
                        let delay = player.random_range(220..650);
                        pending.push((target.spawned_at_ms + delay, target.id));
                    }
                }
            }

            let (due, later): (Vec<_>, Vec<_>) = pending.into_iter().partition(|(at, _)| *at <= now);
            pending = later;
            for (_, id) in due {
                game.click(id, now);
            }
        }

        let Some(summary) = game.summary() else {
            log::error!("Session did not end cleanly");
            return;
        };

        println!("Final score:  {}", summary.final_score);
        println!("Today's best: {}", summary.daily_best);
        println!(
            "Hits {} / wrong {} / timeouts {}  (accuracy {}%)",
            summary.hits, summary.wrong_hits, summary.timeouts, summary.accuracy
        );
        if let (Some(mean), Some(sd)) = (summary.mean_reaction_ms, summary.reaction_std_dev_ms) {
            println!("Reaction time: {mean:.0} ms (sd {sd:.0} ms)");
        }
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => log::debug!("Summary: {json}"),
            Err(e) => log::warn!("Failed to serialize summary: {e}"),
        }
    }
}
