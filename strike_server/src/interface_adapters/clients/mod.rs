// Outbound HTTP clients for external services.

pub mod leaderboard;

pub use leaderboard::HttpLeaderboardStore;
