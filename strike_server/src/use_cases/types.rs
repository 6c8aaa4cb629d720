// Use-case level inputs/outputs for the game loop.

use crate::domain::{
    Airplane, Emplacement, EmplacementRound, Explosion, GroundTarget, InputFlags, Ledger,
    PhaseKind, PlayerAction, Projectile, ScoreEntry,
};

/// Everything that can reach a session's world task.
#[derive(Debug, Clone)]
pub enum GameEvent {
    Input(InputFlags),
    Action(PlayerAction),
    /// Result of the asynchronous high-score check for run `run`.
    HighScoreVerdict { run: u64, qualifies: bool },
    TopScoresLoaded(Vec<ScoreEntry>),
}

/// Notifications the simulation raises for its driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    RunStarted { run: u64 },
    EmplacementsArmed { score: u32 },
    GameOver { run: u64, score: u32 },
    /// The driver should ask the leaderboard whether `score` qualifies.
    HighScoreCheck { run: u64, score: u32 },
    /// The driver should persist the entry and then refresh the board.
    ScoreSubmitted { name: String, score: u32 },
    /// The driver should refresh the cached top scores.
    LeaderboardRequested,
}

/// One-tick hooks for sound and screen effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    TargetDamaged,
    TargetDestroyed,
    EmplacementDestroyed,
    AirplaneHit,
}

#[derive(Debug, Clone)]
pub struct EmplacementView {
    pub gun: Emplacement,
    /// Spawn fade-in, 0.0..=1.0.
    pub fade: f32,
}

/// Read-only view of a session, produced between ticks.
#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub tick: u64,
    pub phase: PhaseKind,
    pub airplane: Airplane,
    pub projectiles: Vec<Projectile>,
    pub targets: Vec<GroundTarget>,
    pub emplacements: Vec<EmplacementView>,
    pub rounds: Vec<EmplacementRound>,
    pub explosions: Vec<Explosion>,
    pub ledger: Ledger,
    pub background_offset: f32,
    pub name_buffer: String,
    pub top_scores: Vec<ScoreEntry>,
    pub cues: Vec<Cue>,
}
