//! Daily best-score ledger
//!
//! One record per (calendar day, difficulty, distractor mode), keeping the
//! best score seen for that key. The whole ledger is stored as a JSON array
//! under a single key. Unreadable or corrupt data is treated as an empty
//! ledger: losing cosmetic history beats failing a session.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::persistence::KeyValueStore;

/// Storage key for the ledger
pub const STORAGE_KEY: &str = "attention-app-highscores";

/// Best score for one (date, difficulty, distractor mode) key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Calendar day, serialized as YYYY-MM-DD
    pub date: NaiveDate,
    pub difficulty: Difficulty,
    /// Older ledgers predate distractor mode
    #[serde(default)]
    pub distractor_enabled: bool,
    #[serde(rename = "score")]
    pub best_score: u32,
}

impl ScoreRecord {
    fn matches(&self, date: NaiveDate, difficulty: Difficulty, distractor_enabled: bool) -> bool {
        self.date == date
            && self.difficulty == difficulty
            && self.distractor_enabled == distractor_enabled
    }
}

/// In-memory copy of the persisted ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreLedger {
    pub records: Vec<ScoreRecord>,
}

impl ScoreLedger {
    /// Best score for a key, 0 if none recorded
    pub fn best(&self, date: NaiveDate, difficulty: Difficulty, distractor_enabled: bool) -> u32 {
        self.records
            .iter()
            .find(|r| r.matches(date, difficulty, distractor_enabled))
            .map(|r| r.best_score)
            .unwrap_or(0)
    }

    /// Insert or raise the record for a key.
    /// Returns true if the ledger changed.
    pub fn upsert(
        &mut self,
        date: NaiveDate,
        difficulty: Difficulty,
        distractor_enabled: bool,
        score: u32,
    ) -> bool {
        match self
            .records
            .iter_mut()
            .find(|r| r.matches(date, difficulty, distractor_enabled))
        {
            Some(record) if score > record.best_score => {
                record.best_score = score;
                true
            }
            Some(_) => false,
            None => {
                self.records.push(ScoreRecord {
                    date,
                    difficulty,
                    distractor_enabled,
                    best_score: score,
                });
                true
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Score ledger on top of a key-value store
pub struct ScoreStore<S> {
    store: S,
}

impl<S: KeyValueStore> ScoreStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the ledger, falling back to empty on any read/parse failure
    pub fn load_ledger(&self) -> ScoreLedger {
        let json = match self.store.get(STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return ScoreLedger::default(),
            Err(e) => {
                log::warn!("Failed to read high scores: {e}");
                return ScoreLedger::default();
            }
        };

        match serde_json::from_str::<ScoreLedger>(&json) {
            Ok(ledger) => {
                log::debug!("Loaded {} score records", ledger.records.len());
                ledger
            }
            Err(e) => {
                log::warn!("Corrupt high score ledger, starting fresh: {e}");
                ScoreLedger::default()
            }
        }
    }

    /// Best score for a key, 0 when nothing was recorded
    pub fn best_score(&self, date: NaiveDate, difficulty: Difficulty, distractor_enabled: bool) -> u32 {
        self.load_ledger().best(date, difficulty, distractor_enabled)
    }

    /// Record a score, keeping the day's maximum for the key.
    /// Write failures are logged and dropped.
    pub fn record_score(
        &self,
        date: NaiveDate,
        difficulty: Difficulty,
        distractor_enabled: bool,
        score: u32,
    ) {
        let mut ledger = self.load_ledger();
        if !ledger.upsert(date, difficulty, distractor_enabled, score) {
            return;
        }

        let saved = serde_json::to_string(&ledger)
            .map_err(crate::persistence::StoreError::from)
            .and_then(|json| self.store.set(STORAGE_KEY, &json));
        match saved {
            Ok(()) => log::info!(
                "High score saved: {score} ({date}, {difficulty}, distractors={distractor_enabled})"
            ),
            Err(e) => log::warn!("Failed to save high score: {e}"),
        }
    }
}
