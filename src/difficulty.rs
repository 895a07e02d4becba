//! Difficulty levels and their tuning parameters
//!
//! The catalog is static: every level maps to exactly one immutable config.

use serde::{Deserialize, Serialize};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

/// Tunable parameters for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    /// Time between spawn ticks (ms)
    pub spawn_interval_ms: u64,
    /// Target diameter (px)
    pub target_diameter_px: f32,
    /// Lifetime of an untouched target (ms)
    pub decay_time_ms: u64,
    /// Probability of a no-go target when distractors are enabled (0-1)
    pub distractor_chance: f64,
    /// Targets attempted per spawn tick (>= 1)
    pub simultaneous_spawns: u32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    /// Tuning parameters for this level
    pub fn config(&self) -> DifficultyConfig {
        config_for(*self)
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up the tuning parameters for a difficulty level
pub fn config_for(difficulty: Difficulty) -> DifficultyConfig {
    match difficulty {
        Difficulty::Easy => DifficultyConfig {
            spawn_interval_ms: 1500,
            target_diameter_px: 120.0,
            decay_time_ms: 3000,
            distractor_chance: 0.0,
            simultaneous_spawns: 1,
        },
        Difficulty::Normal => DifficultyConfig {
            spawn_interval_ms: 800,
            target_diameter_px: 100.0,
            decay_time_ms: 2000,
            distractor_chance: 0.3,
            simultaneous_spawns: 1,
        },
        Difficulty::Hard => DifficultyConfig {
            spawn_interval_ms: 500,
            target_diameter_px: 80.0,
            decay_time_ms: 1200,
            distractor_chance: 0.5,
            simultaneous_spawns: 1,
        },
        Difficulty::Expert => DifficultyConfig {
            spawn_interval_ms: 600,
            target_diameter_px: 70.0,
            decay_time_ms: 1200,
            distractor_chance: 0.4,
            simultaneous_spawns: 2,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_well_formed() {
        for difficulty in Difficulty::ALL {
            let cfg = difficulty.config();
            assert!(cfg.spawn_interval_ms > 0);
            assert!(cfg.decay_time_ms > 0);
            assert!(cfg.target_diameter_px > 0.0);
            assert!((0.0..=1.0).contains(&cfg.distractor_chance));
            assert!(cfg.simultaneous_spawns >= 1);
        }
    }

    #[test]
    fn test_normal_values() {
        let cfg = config_for(Difficulty::Normal);
        assert_eq!(cfg.spawn_interval_ms, 800);
        assert_eq!(cfg.decay_time_ms, 2000);
        assert_eq!(cfg.distractor_chance, 0.3);
        assert_eq!(cfg.simultaneous_spawns, 1);
    }

    #[test]
    fn test_expert_spawns_two() {
        assert_eq!(Difficulty::Expert.config().simultaneous_spawns, 2);
    }

    #[test]
    fn test_from_str_round_trip() {
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(difficulty.as_str()), Some(difficulty));
        }
        assert_eq!(Difficulty::from_str("  HARD "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("insane"), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Expert).unwrap();
        assert_eq!(json, "\"expert\"");
    }
}
