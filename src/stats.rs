//! End-of-session summary

use serde::Serialize;

use crate::difficulty::Difficulty;
use crate::sim::{Interaction, Outcome};

/// Results shown after a session ends
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub difficulty: Difficulty,
    pub distractor_enabled: bool,
    pub final_score: u32,
    /// Best score today for this difficulty/mode, including this session
    pub daily_best: u32,
    pub hits: usize,
    pub wrong_hits: usize,
    pub timeouts: usize,
    /// Hits over all recorded interactions, in percent
    pub accuracy: f64,
    /// Mean reaction time of hits (ms)
    pub mean_reaction_ms: Option<f64>,
    /// Population standard deviation of hit reaction times (ms)
    pub reaction_std_dev_ms: Option<f64>,
}

impl SessionSummary {
    pub fn new(
        difficulty: Difficulty,
        distractor_enabled: bool,
        final_score: u32,
        stored_best: u32,
        history: &[Interaction],
    ) -> Self {
        let count = |outcome| history.iter().filter(|i| i.outcome == outcome).count();
        let hits = count(Outcome::Hit);
        let wrong_hits = count(Outcome::WrongHit);
        let timeouts = count(Outcome::Timeout);

        let total = hits + wrong_hits + timeouts;
        let accuracy = if total > 0 {
            (hits as f64 / total as f64 * 100.0).round()
        } else {
            0.0
        };

        let reactions: Vec<f64> = history
            .iter()
            .filter(|i| i.outcome == Outcome::Hit)
            .map(|i| i.reaction_ms as f64)
            .collect();

        Self {
            difficulty,
            distractor_enabled,
            final_score,
            daily_best: final_score.max(stored_best),
            hits,
            wrong_hits,
            timeouts,
            accuracy,
            mean_reaction_ms: mean(&reactions),
            reaction_std_dev_ms: std_dev(&reactions),
        }
    }
}

pub fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}
