use crate::interface_adapters::protocol::{ScoreDto, ScoresResponse};
use crate::interface_adapters::state::AppState;

use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

// Read-only view of the leaderboard for menus outside a game session.
pub async fn scores_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let scores = state
        .leaderboard()
        .top_scores()
        .await
        .into_iter()
        .map(ScoreDto::from)
        .collect();
    Json(ScoresResponse { scores })
}
