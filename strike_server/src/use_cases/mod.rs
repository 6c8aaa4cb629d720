// Use cases layer: application workflows for the game server.

pub mod game;
pub mod leaderboard;
pub mod session;
pub mod simulation;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use leaderboard::LeaderboardService;
pub use session::{SessionHandle, SessionLauncher, SessionSettings};
pub use simulation::Simulation;
pub use types::{Cue, EmplacementView, GameEvent, SimEvent, WorldUpdate};
