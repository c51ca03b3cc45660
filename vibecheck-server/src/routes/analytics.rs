//! Aggregate analytics route

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::auth::RequireAdmin;
use crate::error::ApiError;
use crate::models::AnalyticsReport;
use crate::state::AppState;

/// GET /api/analytics - per-question token counts and response totals
async fn analytics(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsReport>, ApiError> {
    let report = state.db().analytics().await?;
    Ok(Json(report))
}

/// Analytics routes
pub fn router() -> Router<AppState> {
    Router::new().route("/api/analytics", get(analytics))
}
