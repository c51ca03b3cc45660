//! Admin login route

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::error::{ApiError, ValidationError};
use crate::state::AppState;

/// Login request
#[derive(Deserialize)]
struct LoginRequest {
    password: Option<String>,
}

/// Login response carrying the session token
#[derive(Serialize)]
struct LoginResponse {
    token: String,
}

/// POST /api/admin/login - exchange the admin password for a session token
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let password = body
        .password
        .as_deref()
        .ok_or(ValidationError::Missing { field: "password" })?;

    let stored = state
        .db()
        .admin_password_hash()
        .await?
        .ok_or(ApiError::Internal("admin credentials not provisioned"))?;

    if !auth::verify_password(password, &stored) {
        return Err(ApiError::Unauthorized("invalid password"));
    }

    let token = state.sessions().issue();
    Ok(Json(LoginResponse { token }))
}

/// Admin auth routes
pub fn router() -> Router<AppState> {
    Router::new().route("/api/admin/login", post(login))
}
