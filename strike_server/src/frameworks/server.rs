// Framework bootstrap for the strike server runtime.

use crate::domain::LeaderboardStore;
use crate::frameworks::config;
use crate::interface_adapters::clients::HttpLeaderboardStore;
use crate::interface_adapters::net::{scores_handler, ws_handler};
use crate::interface_adapters::state::{AppState, InMemoryLeaderboard, MonotonicClock};
use crate::use_cases::{LeaderboardService, SessionLauncher, SessionSettings};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state()?;
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/scores", get(scores_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Result<Arc<AppState>> {
    let store: Arc<dyn LeaderboardStore> = match config::leaderboard_url() {
        Some(base_url) => {
            let timeout = config::leaderboard_timeout();
            let api_key = config::leaderboard_api_key();
            let client = HttpLeaderboardStore::new(base_url.clone(), api_key.as_deref(), timeout)
                .map_err(|e| {
                    std::io::Error::other(format!("failed to initialize leaderboard client: {e}"))
                })?;
            tracing::debug!(
                leaderboard_url = %base_url,
                leaderboard_timeout_ms = timeout.as_millis(),
                "leaderboard client configured"
            );
            Arc::new(client)
        }
        None => {
            tracing::info!("no leaderboard url; keeping scores in memory");
            Arc::new(InMemoryLeaderboard::default())
        }
    };

    let game = config::game_config();
    tracing::debug!(
        width = game.width,
        height = game.height,
        emplacements = game.features.emplacements,
        leaderboard = game.features.leaderboard,
        "game configured"
    );

    let sessions = SessionLauncher::new(
        SessionSettings {
            input_channel_capacity: config::INPUT_CHANNEL_CAPACITY,
            world_broadcast_capacity: config::WORLD_BROADCAST_CAPACITY,
            tick_interval: config::TICK_INTERVAL,
            game,
        },
        Arc::new(MonotonicClock::new()),
        LeaderboardService::new(store),
    )
    .map_err(|e| std::io::Error::other(format!("invalid game configuration: {e}")))?;

    Ok(Arc::new(AppState {
        sessions,
        fixed_seed: config::session_seed(),
    }))
}
