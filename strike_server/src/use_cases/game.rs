use super::leaderboard::LeaderboardService;
use super::simulation::Simulation;
use super::types::{GameEvent, SimEvent, WorldUpdate};
use crate::domain::{Clock, PhaseKind};
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info};

// Leaderboard replies re-enter the loop through this channel.
const LEADERBOARD_REPLY_CAPACITY: usize = 16;

/// Drives one session: drains client events, ticks the simulation at a fixed rate and
/// publishes a snapshot after every tick. Exits once the input channel is closed.
pub async fn world_task<C: Clock>(
    mut sim: Simulation<C>,
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    phase_tx: watch::Sender<PhaseKind>,
    leaderboard: LeaderboardService,
    tick_interval: Duration,
) {
    let (reply_tx, mut reply_rx) = mpsc::channel::<GameEvent>(LEADERBOARD_REPLY_CAPACITY);

    // Warm the board so the splash screen has scores to show.
    if sim.config().features.leaderboard {
        spawn_leaderboard_work(SimEvent::LeaderboardRequested, &leaderboard, &reply_tx);
    }

    // Drive the fixed-step game loop at the configured tick rate.
    let mut interval = tokio::time::interval(tick_interval);

    loop {
        interval.tick().await;

        loop {
            match input_rx.try_recv() {
                Ok(ev) => apply_event(&mut sim, ev),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!(ticks = sim.tick_count(), "client gone; session ending");
                    return;
                }
            }
        }
        while let Ok(ev) = reply_rx.try_recv() {
            apply_event(&mut sim, ev);
        }

        sim.tick();

        for event in sim.drain_events() {
            spawn_leaderboard_work(event, &leaderboard, &reply_tx);
        }

        let phase = sim.phase().kind();
        phase_tx.send_if_modified(|current| {
            if *current == phase {
                false
            } else {
                *current = phase;
                true
            }
        });

        let _ = world_tx.send(sim.snapshot());
    }
}

fn apply_event<C: Clock>(sim: &mut Simulation<C>, ev: GameEvent) {
    match ev {
        GameEvent::Input(input) => sim.set_input(input),
        GameEvent::Action(action) => sim.handle_action(action),
        GameEvent::HighScoreVerdict { run, qualifies } => {
            sim.record_high_score_verdict(run, qualifies)
        }
        GameEvent::TopScoresLoaded(scores) => sim.load_top_scores(scores),
    }
}

// Leaderboard calls run off-tick; the simulation keeps ticking while they are in flight.
fn spawn_leaderboard_work(
    event: SimEvent,
    leaderboard: &LeaderboardService,
    reply_tx: &mpsc::Sender<GameEvent>,
) {
    let leaderboard = leaderboard.clone();
    let reply_tx = reply_tx.clone();

    match event {
        SimEvent::HighScoreCheck { run, score } => {
            tokio::spawn(async move {
                let qualifies = leaderboard.qualifies(score).await;
                debug!(run, score, qualifies, "high-score verdict");
                let _ = reply_tx
                    .send(GameEvent::HighScoreVerdict { run, qualifies })
                    .await;
            });
        }
        SimEvent::ScoreSubmitted { name, score } => {
            tokio::spawn(async move {
                let board = leaderboard.submit(&name, score).await;
                let _ = reply_tx.send(GameEvent::TopScoresLoaded(board)).await;
            });
        }
        SimEvent::LeaderboardRequested => {
            tokio::spawn(async move {
                let board = leaderboard.top_scores().await;
                let _ = reply_tx.send(GameEvent::TopScoresLoaded(board)).await;
            });
        }
        SimEvent::RunStarted { .. }
        | SimEvent::EmplacementsArmed { .. }
        | SimEvent::GameOver { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GameConfig, InputFlags, PlayerAction};
    use crate::use_cases::test_support::{ManualClock, RecordingStore};
    use std::sync::Arc;

    struct Harness {
        input_tx: mpsc::Sender<GameEvent>,
        world_rx: broadcast::Receiver<WorldUpdate>,
        phase_rx: watch::Receiver<PhaseKind>,
        task: tokio::task::JoinHandle<()>,
    }

    fn start(store: RecordingStore) -> Harness {
        let sim = Simulation::new(GameConfig::desktop(), ManualClock::at(0), 5).expect("valid");
        let (input_tx, input_rx) = mpsc::channel(64);
        let (world_tx, world_rx) = broadcast::channel(1024);
        let (phase_tx, phase_rx) = watch::channel(PhaseKind::Splash);
        let task = tokio::spawn(world_task(
            sim,
            input_rx,
            world_tx,
            phase_tx,
            LeaderboardService::new(Arc::new(store)),
            Duration::from_millis(1),
        ));
        Harness {
            input_tx,
            world_rx,
            phase_rx,
            task,
        }
    }

    async fn next_update_where(
        rx: &mut broadcast::Receiver<WorldUpdate>,
        pred: impl Fn(&WorldUpdate) -> bool,
    ) -> WorldUpdate {
        loop {
            match rx.recv().await {
                Ok(update) if pred(&update) => return update,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("world task stopped"),
            }
        }
    }

    #[tokio::test]
    async fn when_session_starts_then_cached_board_is_loaded() {
        let mut harness = start(RecordingStore::with_scores(&[("Ace", 12)]));
        let update = tokio::time::timeout(
            Duration::from_secs(2),
            next_update_where(&mut harness.world_rx, |u| !u.top_scores.is_empty()),
        )
        .await
        .expect("board loaded");
        assert_eq!(update.top_scores[0].name, "Ace");
    }

    #[tokio::test]
    async fn when_start_is_sent_then_phase_and_snapshots_follow() {
        let mut harness = start(RecordingStore::new());
        harness
            .input_tx
            .send(GameEvent::Action(PlayerAction::StartGame))
            .await
            .expect("task alive");
        harness
            .input_tx
            .send(GameEvent::Input(InputFlags {
                fire: true,
                ..InputFlags::default()
            }))
            .await
            .expect("task alive");

        let update = tokio::time::timeout(
            Duration::from_secs(2),
            next_update_where(&mut harness.world_rx, |u| !u.projectiles.is_empty()),
        )
        .await
        .expect("rocket fired");
        assert_eq!(update.phase, PhaseKind::Playing);
        assert_eq!(update.ledger.health, 5);

        tokio::time::timeout(
            Duration::from_secs(2),
            harness
                .phase_rx
                .wait_for(|phase| *phase == PhaseKind::Playing),
        )
        .await
        .expect("phase published")
        .expect("phase channel open");
    }

    #[tokio::test]
    async fn when_input_channel_closes_then_task_exits() {
        let harness = start(RecordingStore::new());
        drop(harness.input_tx);
        tokio::time::timeout(Duration::from_secs(2), harness.task)
            .await
            .expect("task exits")
            .expect("task did not panic");
    }
}
