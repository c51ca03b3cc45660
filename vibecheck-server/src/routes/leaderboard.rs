//! Public leaderboard route

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::ApiError;
use crate::models::LeaderboardEntry;
use crate::state::AppState;

/// Number of entries the leaderboard exposes
const LEADERBOARD_SIZE: i64 = 5;

/// GET /api/leaderboard - top scores, highest first
async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let entries = state.db().top_responses(LEADERBOARD_SIZE).await?;
    Ok(Json(entries))
}

/// Leaderboard routes
pub fn router() -> Router<AppState> {
    Router::new().route("/api/leaderboard", get(leaderboard))
}
