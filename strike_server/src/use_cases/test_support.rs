use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::errors::LeaderboardError;
use crate::domain::ports::{Clock, LeaderboardStore, ScoreEntry};

// Shared manual time source for deterministic use-case tests.
#[derive(Clone, Default)]
pub(crate) struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub(crate) fn at(now_ms: u64) -> Self {
        Self(Arc::new(AtomicU64::new(now_ms)))
    }

    pub(crate) fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub fetch: bool,
    pub submit: bool,
}

#[derive(Clone, Default)]
pub(crate) struct RecordingStore {
    entries: Arc<Mutex<Vec<ScoreEntry>>>,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_scores(scores: &[(&str, u32)]) -> Self {
        let store = Self::new();
        {
            let mut guard = store.entries.lock().expect("entries mutex poisoned");
            guard.extend(scores.iter().map(|(name, score)| ScoreEntry {
                name: name.to_string(),
                score: *score,
                recorded_at: None,
            }));
        }
        store
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn recorded(&self) -> Vec<ScoreEntry> {
        self.entries.lock().expect("entries mutex poisoned").clone()
    }
}

#[async_trait]
impl LeaderboardStore for RecordingStore {
    async fn fetch_top(&self, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        if self.failures.fetch {
            return Err(LeaderboardError::Unavailable("fetch failed".to_string()));
        }

        let mut entries = self.entries.lock().expect("entries mutex poisoned").clone();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn submit(&self, name: &str, score: u32) -> Result<(), LeaderboardError> {
        if self.failures.submit {
            return Err(LeaderboardError::Unavailable("submit failed".to_string()));
        }

        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        guard.push(ScoreEntry {
            name: name.to_string(),
            score,
            recorded_at: None,
        });
        Ok(())
    }
}
