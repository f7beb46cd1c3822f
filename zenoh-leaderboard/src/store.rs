//! Top-N score stores
//!
//! Every backend applies the same ranking on submit: append the stamped
//! record, sort by score descending, keep the first `capacity` records.
//! The sort is stable, so equal scores keep submission order (earlier first).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::StoreBackend;
use crate::error::{LeaderboardError, Result};
use crate::types::{ScoreRecord, ScoreSubmission};

/// Storage backend for leaderboard records
pub trait ScoreStore {
    /// Records ordered by score, highest first
    fn top(&self) -> Result<Vec<ScoreRecord>>;

    /// Insert a submission and return the stored record
    fn submit(&mut self, submission: ScoreSubmission) -> Result<ScoreRecord>;
}

/// Store shared between the zenoh service and the HTTP gateway
pub type SharedStore = Arc<Mutex<dyn ScoreStore + Send>>;

/// Open the store selected by `backend`
pub fn open_store(backend: &StoreBackend, capacity: usize) -> Result<SharedStore> {
    let store = match backend {
        StoreBackend::Memory => Arc::new(Mutex::new(MemoryStore::new(capacity))) as SharedStore,
        StoreBackend::JsonFile(path) => {
            Arc::new(Mutex::new(JsonFileStore::open(path, capacity)?)) as SharedStore
        }
    };
    Ok(store)
}

fn insert_ranked(records: &mut Vec<ScoreRecord>, record: ScoreRecord, capacity: usize) {
    records.push(record);
    records.sort_by(|a, b| b.score.cmp(&a.score));
    records.truncate(capacity);
}

/// Records kept in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<ScoreRecord>,
    capacity: usize,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity: capacity.max(1),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn top(&self) -> Result<Vec<ScoreRecord>> {
        Ok(self.records.clone())
    }

    fn submit(&mut self, submission: ScoreSubmission) -> Result<ScoreRecord> {
        let record = ScoreRecord::stamped(submission.validated()?);
        insert_ranked(&mut self.records, record.clone(), self.capacity);
        Ok(record)
    }
}

/// Flat JSON array file, rewritten on every submit
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Vec<ScoreRecord>,
    capacity: usize,
}

impl JsonFileStore {
    /// Open the file, creating it as an empty list when absent
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            fs::write(&path, "[]")?;
            tracing::info!("Created empty score file {}", path.display());
            Vec::new()
        };
        let mut store = Self {
            path,
            records,
            capacity: capacity.max(1),
        };
        store.records.sort_by(|a, b| b.score.cmp(&a.score));
        store.records.truncate(store.capacity);
        tracing::debug!(
            "Loaded {} score(s) from {}",
            store.records.len(),
            store.path.display()
        );
        Ok(store)
    }

    fn persist(&self, records: &[ScoreRecord]) -> Result<()> {
        let text = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, text).map_err(LeaderboardError::Io)
    }
}

impl ScoreStore for JsonFileStore {
    fn top(&self) -> Result<Vec<ScoreRecord>> {
        Ok(self.records.clone())
    }

    fn submit(&mut self, submission: ScoreSubmission) -> Result<ScoreRecord> {
        let record = ScoreRecord::stamped(submission.validated()?);
        let mut records = self.records.clone();
        insert_ranked(&mut records, record.clone(), self.capacity);
        // Memory only changes once the file write succeeded
        self.persist(&records)?;
        self.records = records;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, score: u64) -> ScoreSubmission {
        ScoreSubmission::new(name, score).unwrap()
    }

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "zenoh-leaderboard-{}-{}-{}.json",
            tag,
            std::process::id(),
            rand::random::<u32>()
        ))
    }

    #[test]
    fn test_empty_store_returns_empty_list() {
        let store = MemoryStore::new(10);
        assert!(store.top().unwrap().is_empty());
    }

    #[test]
    fn test_sorted_descending() {
        let mut store = MemoryStore::new(10);
        store.submit(submission("a", 100)).unwrap();
        store.submit(submission("b", 300)).unwrap();
        store.submit(submission("c", 200)).unwrap();
        let scores: Vec<u64> = store.top().unwrap().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
    }

    #[test]
    fn test_truncated_to_capacity() {
        let mut store = MemoryStore::new(3);
        for score in [10, 50, 20, 40, 30] {
            store.submit(submission("p", score)).unwrap();
        }
        let scores: Vec<u64> = store.top().unwrap().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![50, 40, 30]);
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let mut store = MemoryStore::new(10);
        store.submit(submission("first", 100)).unwrap();
        store.submit(submission("second", 100)).unwrap();
        let names: Vec<String> = store
            .top()
            .unwrap()
            .into_iter()
            .map(|r| r.player_name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_invalid_submission_not_stored() {
        let mut store = MemoryStore::new(10);
        let bad = ScoreSubmission {
            player_name: "".to_string(),
            score: 5,
        };
        assert!(matches!(
            store.submit(bad),
            Err(LeaderboardError::InvalidRecord(_))
        ));
        assert!(store.top().unwrap().is_empty());
    }

    #[test]
    fn test_json_store_creates_file_and_reloads() {
        let path = temp_path("reload");
        {
            let mut store = JsonFileStore::open(&path, 50).unwrap();
            assert!(path.exists());
            assert!(store.top().unwrap().is_empty());
            store.submit(submission("Orion", 700)).unwrap();
            store.submit(submission("Luna", 900)).unwrap();
        }
        let store = JsonFileStore::open(&path, 50).unwrap();
        let top = store.top().unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].player_name, "Luna");
        assert_eq!(top[1].player_name, "Orion");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_json_store_rejects_corrupt_file() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();
        let err = JsonFileStore::open(&path, 50).unwrap_err();
        assert!(matches!(err, LeaderboardError::Serialization(_)));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_open_shared_memory_store() {
        let store = open_store(&StoreBackend::Memory, 5).unwrap();
        store.lock().unwrap().submit(submission("Ash", 1)).unwrap();
        assert_eq!(store.lock().unwrap().top().unwrap().len(), 1);
    }
}
