use async_trait::async_trait;

use crate::domain::errors::LeaderboardError;

/// One persisted high score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub recorded_at: Option<String>,
}

// Port for the external high-score store.
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Best `limit` scores, highest first.
    async fn fetch_top(&self, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError>;
    async fn submit(&self, name: &str, score: u32) -> Result<(), LeaderboardError>;
}

// Port for monotonic wall-clock milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}
