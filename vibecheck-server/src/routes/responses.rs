//! Response submission and admin response management
//!
//! Submission is public: the score is computed once here and stored with
//! the response. Answer values outside the accepted token set are stored
//! as NULL, and question ids are not checked against the questions table.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::RequireAdmin;
use crate::error::{ApiError, ValidationError};
use crate::models::ResponseDetail;
use crate::scoring;
use crate::state::AppState;

/// Submission request body
#[derive(Deserialize)]
struct SubmitRequest {
    name: Option<String>,
    answers: Option<BTreeMap<i64, Value>>,
}

/// Submission result
#[derive(Serialize)]
struct SubmitResponse {
    id: i64,
    score: i64,
}

/// POST /api/responses - submit a scored response
async fn submit_response(
    State(state): State<AppState>,
    Json(body): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let name = body
        .name
        .as_deref()
        .ok_or(ValidationError::Missing { field: "name" })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Empty { field: "name" }.into());
    }
    let answers = body
        .answers
        .as_ref()
        .ok_or(ValidationError::Missing { field: "answers" })?;

    let normalized: Vec<_> = answers
        .iter()
        .map(|(question_id, value)| (*question_id, scoring::normalize(value)))
        .collect();
    let score = scoring::total_points(normalized.iter().map(|(_, token)| *token));
    let stored: Vec<(i64, Option<String>)> = normalized
        .into_iter()
        .map(|(question_id, token)| (question_id, token.map(|t| t.to_string())))
        .collect();

    let id = state.db().create_response(name, &stored, score).await?;
    Ok((StatusCode::CREATED, Json(SubmitResponse { id, score })))
}

/// GET /api/responses - all responses with answers, newest first
async fn list_responses(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ResponseDetail>>, ApiError> {
    let responses = state.db().list_responses().await?;
    Ok(Json(responses))
}

/// DELETE /api/responses/{id} - remove a response and its answers
async fn delete_response(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !state.db().delete_response(id).await? {
        return Err(ApiError::NotFound {
            resource: "response",
            id,
        });
    }
    Ok(Json(json!({ "ok": true })))
}

/// Response routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/responses", get(list_responses).post(submit_response))
        .route("/api/responses/{id}", delete(delete_response))
}
