use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::domain::errors::LeaderboardError;
use crate::domain::ports::{Clock, LeaderboardStore, ScoreEntry};
use crate::use_cases::{LeaderboardService, SessionLauncher};

// Application state shared by every route.
#[derive(Clone)]
pub struct AppState {
    // Builds one session (and world task) per websocket connection.
    pub sessions: SessionLauncher,
    // Pins every session to one seed; random per session when unset.
    pub fixed_seed: Option<u64>,
}

impl AppState {
    pub fn leaderboard(&self) -> &LeaderboardService {
        self.sessions.leaderboard()
    }
}

// Entries kept by the in-memory board. Only the top few are ever read.
const IN_MEMORY_RETAINED: usize = 32;

// In-memory leaderboard adapter, used when no external store is configured.
// Entries stay sorted by score, highest first; equal scores keep arrival order.
#[derive(Clone)]
pub struct InMemoryLeaderboard {
    entries: Arc<Mutex<Vec<ScoreEntry>>>,
    retained: usize,
}

impl InMemoryLeaderboard {
    pub fn with_capacity(retained: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::with_capacity(retained + 1))),
            retained: retained.max(1),
        }
    }
}

impl Default for InMemoryLeaderboard {
    fn default() -> Self {
        Self::with_capacity(IN_MEMORY_RETAINED)
    }
}

#[async_trait]
impl LeaderboardStore for InMemoryLeaderboard {
    async fn fetch_top(&self, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let entries = self.entries.lock().await;
        Ok(entries.iter().take(limit).cloned().collect())
    }

    async fn submit(&self, name: &str, score: u32) -> Result<(), LeaderboardError> {
        let recorded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string();
        let mut entries = self.entries.lock().await;
        // Insert after every entry with an equal or higher score.
        let at = entries.partition_point(|entry| entry.score >= score);
        entries.insert(
            at,
            ScoreEntry {
                name: name.to_string(),
                score,
                recorded_at: Some(recorded_at),
            },
        );
        entries.truncate(self.retained);
        Ok(())
    }
}

// Monotonic clock adapter: milliseconds since the process created it.
#[derive(Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
