//! Question endpoints
//!
//! Reads are public; writes require an admin session. New questions land
//! at the end of the display order.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::RequireAdmin;
use crate::error::{ApiError, ValidationError};
use crate::models::Question;
use crate::state::AppState;

/// Create/update request body
#[derive(Deserialize)]
struct QuestionBody {
    text: Option<String>,
}

impl QuestionBody {
    /// Trimmed, non-empty text or a validation error
    fn text(&self) -> Result<&str, ValidationError> {
        let text = self
            .text
            .as_deref()
            .ok_or(ValidationError::Missing { field: "text" })?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::Empty { field: "text" });
        }
        Ok(text)
    }
}

/// GET /api/questions - all questions in display order
async fn list_questions(State(state): State<AppState>) -> Result<Json<Vec<Question>>, ApiError> {
    let questions = state.db().list_questions().await?;
    Ok(Json(questions))
}

/// POST /api/questions - append a question to the display order
async fn create_question(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<QuestionBody>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    let text = body.text()?;
    let question = state.db().create_question(text).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// PUT /api/questions/{id} - update a question's text
async fn update_question(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<QuestionBody>,
) -> Result<Json<Value>, ApiError> {
    let text = body.text()?;
    if !state.db().update_question(id, text).await? {
        return Err(ApiError::NotFound {
            resource: "question",
            id,
        });
    }
    Ok(Json(json!({ "ok": true })))
}

/// DELETE /api/questions/{id} - remove a question, leaving its answers behind
async fn delete_question(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !state.db().delete_question(id).await? {
        return Err(ApiError::NotFound {
            resource: "question",
            id,
        });
    }
    Ok(Json(json!({ "ok": true })))
}

/// Question routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/questions", get(list_questions).post(create_question))
        .route(
            "/api/questions/{id}",
            put(update_question).delete(delete_question),
        )
}
