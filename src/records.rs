//! Local run ledger
//!
//! Finished runs are serialized to JSON through a small key-value store
//! abstraction, so tests run against an in-memory map while the binary
//! persists to a file next to the executable. Corrupt or missing data
//! degrades to an empty ledger rather than an error.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::sim::{Difficulty, RunOutcome};

/// Storage key for the ledger
const RECORDS_KEY: &str = "breakout_game_records";
/// Newest records kept; older ones are dropped on save
pub const MAX_RECORDS: usize = 20;

/// Minimal string key-value store
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.map.remove(key);
    }
}

/// File-backed store: one JSON file per key under a base directory.
/// I/O failures are logged and swallowed; gameplay never blocks on disk.
#[derive(Debug)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = fs::create_dir_all(&self.base_dir) {
            log::warn!("failed to create record dir: {e}");
            return;
        }
        if let Err(e) = fs::write(self.path_for(key), value) {
            log::warn!("failed to write records: {e}");
        }
    }

    fn remove(&mut self, key: &str) {
        if let Err(e) = fs::remove_file(self.path_for(key)) {
            log::debug!("failed to remove records: {e}");
        }
    }
}

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: u64,
    pub outcome: RunOutcome,
    pub difficulty: Difficulty,
    pub score: u32,
    /// Run duration in seconds
    pub time: f32,
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
}

impl GameRecord {
    pub fn new(
        outcome: RunOutcome,
        difficulty: Difficulty,
        score: u32,
        time: f32,
        timestamp: u64,
    ) -> Self {
        Self {
            id: timestamp,
            outcome,
            difficulty,
            score,
            time,
            timestamp,
        }
    }
}

/// Record book over an arbitrary store, newest record first
pub struct RecordBook<S: KvStore> {
    store: S,
    records: Vec<GameRecord>,
}

impl<S: KvStore> RecordBook<S> {
    /// Load from the store; malformed or missing data yields an empty book
    pub fn load(store: S) -> Self {
        let records = store
            .get(RECORDS_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        Self { store, records }
    }

    /// Prepend a record and persist, keeping at most [`MAX_RECORDS`]
    pub fn save_record(&mut self, record: GameRecord) {
        self.records.insert(0, record);
        self.records.truncate(MAX_RECORDS);
        self.persist();
        log::info!("record saved, {} total", self.records.len());
    }

    /// Append a run as a record stamped with the current wall clock
    pub fn record_run(
        &mut self,
        outcome: RunOutcome,
        difficulty: Difficulty,
        score: u32,
        time: f32,
    ) {
        self.save_record(GameRecord::new(outcome, difficulty, score, time, now_ms()));
    }

    /// Newest records first
    pub fn latest(&self, limit: usize) -> &[GameRecord] {
        &self.records[..self.records.len().min(limit)]
    }

    /// Records sorted by score descending; score ties go to the newer run
    pub fn best_by_score(&self, limit: usize) -> Vec<GameRecord> {
        let mut sorted = self.records.clone();
        sorted.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        });
        sorted.truncate(limit);
        sorted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record, in memory and in the store
    pub fn clear(&mut self) {
        self.records.clear();
        self.store.remove(RECORDS_KEY);
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.records) {
            Ok(json) => self.store.set(RECORDS_KEY, &json),
            Err(e) => log::warn!("failed to serialize records: {e}"),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: u32, timestamp: u64) -> GameRecord {
        GameRecord::new(
            RunOutcome::GameOver,
            Difficulty::Normal,
            score,
            12.5,
            timestamp,
        )
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut book = RecordBook::load(MemoryStore::default());
        book.save_record(record(100, 1));
        book.save_record(record(200, 2));

        let reloaded = RecordBook::load(book.store);
        assert_eq!(reloaded.len(), 2);
        // Newest first
        assert_eq!(reloaded.latest(10)[0].score, 200);
        assert_eq!(reloaded.latest(1).len(), 1);
    }

    #[test]
    fn test_cap_at_max_records() {
        let mut book = RecordBook::load(MemoryStore::default());
        for i in 0..(MAX_RECORDS as u64 + 5) {
            book.save_record(record(i as u32, i));
        }
        assert_eq!(book.len(), MAX_RECORDS);
        // The oldest runs fell off the end
        assert_eq!(book.latest(MAX_RECORDS).last().map(|r| r.score), Some(5));
    }

    #[test]
    fn test_best_by_score_tie_breaks_newest() {
        let mut book = RecordBook::load(MemoryStore::default());
        book.save_record(record(50, 1));
        book.save_record(record(90, 2));
        book.save_record(record(90, 3));

        let best = book.best_by_score(2);
        assert_eq!(best[0].timestamp, 3);
        assert_eq!(best[1].timestamp, 2);
    }

    #[test]
    fn test_corrupt_store_degrades_to_empty() {
        let mut store = MemoryStore::default();
        store.set(RECORDS_KEY, "not json at all {");
        let book = RecordBook::load(store);
        assert!(book.is_empty());
    }

    #[test]
    fn test_clear_removes_persisted_data() {
        let mut book = RecordBook::load(MemoryStore::default());
        book.save_record(record(10, 1));
        book.clear();
        assert!(book.is_empty());
        let reloaded = RecordBook::load(book.store);
        assert!(reloaded.is_empty());
    }
}
