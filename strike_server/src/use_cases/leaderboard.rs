// High-score workflow over the leaderboard store port. Store failures never reach the
// game: fetches degrade to an empty board and submits to a logged no-op.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ledger::qualifies_for_high_score;
use crate::domain::ports::{LeaderboardStore, ScoreEntry};

/// Size of the public board.
pub const TOP_SCORES: usize = 3;

#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn LeaderboardStore>,
    top_n: usize,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn LeaderboardStore>) -> Self {
        Self {
            store,
            top_n: TOP_SCORES,
        }
    }

    /// Best scores, highest first. Empty when the store is unavailable.
    pub async fn top_scores(&self) -> Vec<ScoreEntry> {
        match self.store.fetch_top(self.top_n).await {
            Ok(mut scores) => {
                scores.truncate(self.top_n);
                scores
            }
            Err(err) => {
                warn!(error = %err, "failed to load top scores");
                Vec::new()
            }
        }
    }

    /// Refreshes the board and checks whether `score` would enter it.
    pub async fn qualifies(&self, score: u32) -> bool {
        let recorded: Vec<u32> = self
            .top_scores()
            .await
            .iter()
            .map(|entry| entry.score)
            .collect();
        qualifies_for_high_score(&recorded, score, self.top_n)
    }

    /// Stores an entry and returns the refreshed board.
    pub async fn submit(&self, name: &str, score: u32) -> Vec<ScoreEntry> {
        match self.store.submit(name, score).await {
            Ok(()) => info!(name, score, "high score saved"),
            Err(err) => warn!(error = %err, name, score, "failed to save high score"),
        }
        self.top_scores().await
    }
}
