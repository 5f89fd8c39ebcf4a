//! Host-side best score persistence.
//!
//! The engine only exposes the current score; the surrounding application
//! owns the best-score record. It is a single integer stored as JSON under a
//! fixed storage key, read once at startup and rewritten whenever the current
//! score beats it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

/// Fixed storage key; the record lives in `<key>.json`
pub const BEST_SCORE_KEY: &str = "gridfall-best-score";

#[derive(Debug)]
pub struct BestScoreStore {
    path: PathBuf,
    best: u32,
}

impl BestScoreStore {
    /// Open the store in `GRIDFALL_DATA_DIR` (or the working directory)
    pub fn open_default() -> Result<Self> {
        let dir = std::env::var("GRIDFALL_DATA_DIR").unwrap_or_else(|_| ".".to_string());
        Self::open(Path::new(&dir).join(format!("{}.json", BEST_SCORE_KEY)))
    }

    /// Open the store at an explicit path
    ///
    /// A missing or unreadable record starts the best score at 0.
    pub fn open(path: PathBuf) -> Result<Self> {
        let best = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<serde_json::Value>(&contents)
                .ok()
                .and_then(|v| v.get("best").and_then(|b| b.as_u64()))
                .map(|b| b as u32)
                .unwrap_or(0),
            Err(_) => 0,
        };

        Ok(Self { path, best })
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record a score; writes only when it beats the stored best
    pub fn record(&mut self, score: u32) -> Result<()> {
        if score <= self.best {
            return Ok(());
        }
        self.best = score;
        fs::write(&self.path, json!({ "best": self.best }).to_string())
            .with_context(|| format!("writing best score to {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "{}-{}-{}.json",
            BEST_SCORE_KEY,
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_record_starts_at_zero() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);

        let store = BestScoreStore::open(path).unwrap();
        assert_eq!(store.best(), 0);
    }

    #[test]
    fn test_record_persists_only_improvements() {
        let path = temp_path("improve");
        let _ = fs::remove_file(&path);

        let mut store = BestScoreStore::open(path.clone()).unwrap();
        store.record(40).unwrap();
        store.record(25).unwrap();
        assert_eq!(store.best(), 40);

        let reopened = BestScoreStore::open(path.clone()).unwrap();
        assert_eq!(reopened.best(), 40);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_record_is_tolerated() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json").unwrap();

        let store = BestScoreStore::open(path.clone()).unwrap();
        assert_eq!(store.best(), 0);

        let _ = fs::remove_file(&path);
    }
}
