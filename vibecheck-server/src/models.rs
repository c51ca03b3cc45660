//! Row and response models for the vibecheck API

use std::collections::BTreeMap;

use serde::Serialize;

use crate::scoring::AnswerValue;

// ============================================================================
// Questions
// ============================================================================

/// A survey question
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub text: String,
    /// Display order; not necessarily contiguous or unique
    pub position: i64,
}

// ============================================================================
// Responses
// ============================================================================

/// A response row as stored, without its answers
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResponseRow {
    pub id: i64,
    pub name: String,
    pub score: i64,
    pub submitted_at: String,
}

/// A response with its answers keyed by question id
///
/// Answer values are the stored tokens; NULL marks a submitted value that
/// was not recognized.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseDetail {
    pub id: i64,
    pub name: String,
    pub score: i64,
    pub submitted_at: String,
    pub answers: BTreeMap<i64, Option<String>>,
}

/// One leaderboard row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
}

// ============================================================================
// Analytics
// ============================================================================

/// Aggregate answer counts across all responses
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub total_responses: i64,
    pub questions: Vec<QuestionAnalytics>,
}

/// Token counts for a single question
#[derive(Debug, Clone, Serialize)]
pub struct QuestionAnalytics {
    pub question_id: i64,
    pub text: String,
    /// Count per accepted token, zero-filled
    pub counts: BTreeMap<AnswerValue, i64>,
    /// Answers that matched an accepted token
    pub total: i64,
}
