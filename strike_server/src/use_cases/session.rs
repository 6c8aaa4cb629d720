// Session orchestration: one simulation and world task per connected player.

use crate::domain::{Clock, ConfigError, GameConfig, PhaseKind};
use crate::use_cases::game::world_task;
use crate::use_cases::leaderboard::LeaderboardService;
use crate::use_cases::simulation::Simulation;
use crate::use_cases::{GameEvent, WorldUpdate};
use axum::extract::ws::Utf8Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::info;

/// Shared configuration for spawning session worlds.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Capacity for inbound client events.
    pub input_channel_capacity: usize,
    /// Capacity for broadcast world updates.
    pub world_broadcast_capacity: usize,
    /// Fixed tick interval for the game loop.
    pub tick_interval: Duration,
    /// Playfield every new session is built from.
    pub game: GameConfig,
}

/// Per-session channels.
#[derive(Clone)]
pub struct SessionHandle {
    pub session_id: Arc<str>,
    pub seed: u64,
    /// Sender for client events into the session world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    /// Broadcast sender for raw world updates.
    pub world_tx: broadcast::Sender<WorldUpdate>,
    /// Broadcast sender for serialized world updates.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    /// Watch sender holding the latest serialized world update.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    /// Watch sender for phase changes.
    pub phase_tx: watch::Sender<PhaseKind>,
}

/// Builds sessions from shared settings, clock and leaderboard.
#[derive(Clone)]
pub struct SessionLauncher {
    settings: SessionSettings,
    clock: Arc<dyn Clock>,
    leaderboard: LeaderboardService,
}

impl SessionLauncher {
    /// Fails when the configured playfield is unusable.
    pub fn new(
        settings: SessionSettings,
        clock: Arc<dyn Clock>,
        leaderboard: LeaderboardService,
    ) -> Result<Self, ConfigError> {
        settings.game.validate()?;
        Ok(Self {
            settings,
            clock,
            leaderboard,
        })
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn leaderboard(&self) -> &LeaderboardService {
        &self.leaderboard
    }

    /// Creates a session and spawns its world task. The task stops once every clone
    /// of the returned handle's `input_tx` is dropped.
    pub fn launch(&self, session_id: String, seed: u64) -> Result<SessionHandle, ConfigError> {
        let sim = Simulation::new(self.settings.game.clone(), self.clock.clone(), seed)?;

        // Channel wiring for the session world loop.
        let (input_tx, input_rx) = mpsc::channel::<GameEvent>(self.settings.input_channel_capacity);
        let (world_tx, _world_rx) =
            broadcast::channel::<WorldUpdate>(self.settings.world_broadcast_capacity);
        let (world_bytes_tx, _world_bytes_rx) =
            broadcast::channel::<Utf8Bytes>(self.settings.world_broadcast_capacity);
        let (world_latest_tx, _world_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));
        let (phase_tx, _phase_rx) = watch::channel::<PhaseKind>(sim.phase().kind());

        // Spawn the authoritative world loop for this session.
        tokio::spawn(world_task(
            sim,
            input_rx,
            world_tx.clone(),
            phase_tx.clone(),
            self.leaderboard.clone(),
            self.settings.tick_interval,
        ));
        info!(session_id = %session_id, seed, "session started");

        Ok(SessionHandle {
            session_id: Arc::from(session_id),
            seed,
            input_tx,
            world_tx,
            world_bytes_tx,
            world_latest_tx,
            phase_tx,
        })
    }
}
