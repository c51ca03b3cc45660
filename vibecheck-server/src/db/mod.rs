//! SQLite persistence for vibecheck
//!
//! One database file holds questions, responses, answers, and the admin
//! credential row. The schema is applied idempotently at open time;
//! `seed` fills in the admin credential and default questions on first
//! boot. Query methods take already-validated values and run multi-row
//! writes inside transactions.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::models::{
    AnalyticsReport, LeaderboardEntry, Question, QuestionAnalytics, ResponseDetail, ResponseRow,
};
use crate::scoring::AnswerValue;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Questions seeded when the table is empty
const DEFAULT_QUESTIONS: [&str; 5] = [
    "How are the vibes today?",
    "How was the music?",
    "How did the food land?",
    "Rate the company you kept",
    "Would you come back next time?",
];

/// Pooled handle to the vibecheck database
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database at the given path and apply the schema
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, DbError> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // No foreign_keys pragma: answers outlive their question on purpose
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        // Multi-statement DDL needs raw execution
        sqlx::raw_sql(include_str!("schema.sql")).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Seed the admin credential and default questions when absent
    pub async fn seed(&self, admin_password_hash: &str) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let admin_rows: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin")
            .fetch_one(&mut *tx)
            .await?;
        if admin_rows.0 == 0 {
            sqlx::query("INSERT INTO admin (id, password_hash) VALUES (1, ?1)")
                .bind(admin_password_hash)
                .execute(&mut *tx)
                .await?;
            tracing::info!("Seeded admin credential");
        }

        let question_rows: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM questions")
            .fetch_one(&mut *tx)
            .await?;
        if question_rows.0 == 0 {
            let created_at = Utc::now().to_rfc3339();
            for (i, text) in DEFAULT_QUESTIONS.into_iter().enumerate() {
                sqlx::query("INSERT INTO questions (text, position, created_at) VALUES (?1, ?2, ?3)")
                    .bind(text)
                    .bind(i as i64 + 1)
                    .bind(&created_at)
                    .execute(&mut *tx)
                    .await?;
            }
            tracing::info!(count = DEFAULT_QUESTIONS.len(), "Seeded default questions");
        }

        tx.commit().await?;
        Ok(())
    }

    // ========================================================================
    // Questions
    // ========================================================================

    /// All questions in display order
    pub async fn list_questions(&self) -> Result<Vec<Question>, DbError> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT id, text, position FROM questions ORDER BY position ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    /// Insert a question at the end of the display order
    pub async fn create_question(&self, text: &str) -> Result<Question, DbError> {
        let question = sqlx::query_as::<_, Question>(
            "INSERT INTO questions (text, position, created_at) \
             VALUES (?1, (SELECT COALESCE(MAX(position), 0) + 1 FROM questions), ?2) \
             RETURNING id, text, position",
        )
        .bind(text)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await?;
        Ok(question)
    }

    /// Update a question's text; false when the id matches no row
    pub async fn update_question(&self, id: i64, text: &str) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE questions SET text = ?1 WHERE id = ?2")
            .bind(text)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a question; its answer rows stay behind
    pub async fn delete_question(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Responses
    // ========================================================================

    /// Insert a response and its answer rows in one transaction
    pub async fn create_response(
        &self,
        name: &str,
        answers: &[(i64, Option<String>)],
        score: i64,
    ) -> Result<i64, DbError> {
        let mut tx = self.pool.begin().await?;

        let result =
            sqlx::query("INSERT INTO responses (name, score, submitted_at) VALUES (?1, ?2, ?3)")
                .bind(name)
                .bind(score)
                .bind(Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await?;
        let response_id = result.last_insert_rowid();

        // Batch insert to avoid a statement per answer
        if !answers.is_empty() {
            let mut builder =
                sqlx::QueryBuilder::new("INSERT INTO answers (response_id, question_id, value) ");
            builder.push_values(answers.iter(), |mut b, (question_id, value)| {
                b.push_bind(response_id)
                    .push_bind(*question_id)
                    .push_bind(value.as_deref());
            });
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(response_id)
    }

    /// All responses, newest first, each with its answers keyed by question id
    pub async fn list_responses(&self) -> Result<Vec<ResponseDetail>, DbError> {
        let rows = sqlx::query_as::<_, ResponseRow>(
            "SELECT id, name, score, submitted_at FROM responses \
             ORDER BY submitted_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        // One pass over all answers instead of a query per response
        let answer_rows = sqlx::query_as::<_, (i64, i64, Option<String>)>(
            "SELECT response_id, question_id, value FROM answers ORDER BY response_id, question_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, BTreeMap<i64, Option<String>>> = HashMap::new();
        for (response_id, question_id, value) in answer_rows {
            grouped
                .entry(response_id)
                .or_default()
                .insert(question_id, value);
        }

        Ok(rows
            .into_iter()
            .map(|row| ResponseDetail {
                id: row.id,
                name: row.name,
                score: row.score,
                submitted_at: row.submitted_at,
                answers: grouped.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }

    /// Delete a response and its answers; false when the id matches no row
    pub async fn delete_response(&self, id: i64) -> Result<bool, DbError> {
        let mut tx = self.pool.begin().await?;

        // Answers first, then the response row
        sqlx::query("DELETE FROM answers WHERE response_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM responses WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Highest-scoring responses for the public leaderboard
    pub async fn top_responses(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, DbError> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            "SELECT name, score FROM responses ORDER BY score DESC, id ASC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    // ========================================================================
    // Analytics
    // ========================================================================

    /// Per-question token counts plus the overall response total
    pub async fn analytics(&self) -> Result<AnalyticsReport, DbError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM responses")
            .fetch_one(&self.pool)
            .await?;

        let questions = self.list_questions().await?;

        let counted = sqlx::query_as::<_, (i64, String, i64)>(
            "SELECT question_id, value, COUNT(*) FROM answers \
             WHERE value IS NOT NULL GROUP BY question_id, value",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_question: HashMap<i64, BTreeMap<AnswerValue, i64>> = HashMap::new();
        for (question_id, value, count) in counted {
            // Stored values are constrained to the accepted tokens
            if let Ok(token) = value.parse::<AnswerValue>() {
                by_question
                    .entry(question_id)
                    .or_default()
                    .insert(token, count);
            }
        }

        let questions = questions
            .into_iter()
            .map(|q| {
                let mut counts: BTreeMap<AnswerValue, i64> =
                    AnswerValue::ALL.iter().map(|v| (*v, 0)).collect();
                if let Some(found) = by_question.remove(&q.id) {
                    counts.extend(found);
                }
                let total = counts.values().sum();
                QuestionAnalytics {
                    question_id: q.id,
                    text: q.text,
                    counts,
                    total,
                }
            })
            .collect();

        Ok(AnalyticsReport {
            total_responses: total.0,
            questions,
        })
    }

    // ========================================================================
    // Admin
    // ========================================================================

    /// Stored admin password hash, if provisioned
    pub async fn admin_password_hash(&self) -> Result<Option<String>, DbError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT password_hash FROM admin WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(hash,)| hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn open_test_db() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db")).await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn seed_is_idempotent() {
        let (_dir, db) = open_test_db().await;
        db.seed("hash").await.unwrap();
        db.seed("other-hash").await.unwrap();

        let questions = db.list_questions().await.unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0].position, 1);
        assert_eq!(questions[4].position, 5);
        // First seed wins
        assert_eq!(
            db.admin_password_hash().await.unwrap().as_deref(),
            Some("hash")
        );
    }

    #[tokio::test]
    async fn created_questions_append_to_the_order() {
        let (_dir, db) = open_test_db().await;
        db.seed("hash").await.unwrap();

        let q = db.create_question("Encore?").await.unwrap();
        assert_eq!(q.position, 6);
        let q = db.create_question("One more?").await.unwrap();
        assert_eq!(q.position, 7);

        // Positions restart from max, not from count
        assert!(db.delete_question(q.id).await.unwrap());
        let q = db.create_question("Really one more?").await.unwrap();
        assert_eq!(q.position, 7);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_ids() {
        let (_dir, db) = open_test_db().await;
        db.seed("hash").await.unwrap();

        assert!(db.update_question(1, "Still vibing?").await.unwrap());
        assert!(!db.update_question(999, "Nobody home").await.unwrap());
        assert!(db.delete_question(1).await.unwrap());
        assert!(!db.delete_question(1).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_a_question_keeps_its_answers() {
        let (_dir, db) = open_test_db().await;
        db.seed("hash").await.unwrap();

        let id = db
            .create_response(
                "sam",
                &[(1, Some("topp".into())), (2, Some("flash".into()))],
                5,
            )
            .await
            .unwrap();
        assert!(db.delete_question(1).await.unwrap());

        let responses = db.list_responses().await.unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].id, id);
        assert_eq!(responses[0].answers.len(), 2);
        assert_eq!(responses[0].answers[&1].as_deref(), Some("topp"));
    }

    #[tokio::test]
    async fn deleting_a_response_removes_its_answers() {
        let (_dir, db) = open_test_db().await;
        db.seed("hash").await.unwrap();

        let keep = db
            .create_response("keep", &[(1, Some("topp".into()))], 2)
            .await
            .unwrap();
        let gone = db
            .create_response("gone", &[(1, Some("flash".into())), (2, None)], 3)
            .await
            .unwrap();

        assert!(db.delete_response(gone).await.unwrap());
        assert!(!db.delete_response(gone).await.unwrap());

        let responses = db.list_responses().await.unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].id, keep);

        // The survivor's answers are untouched
        let report = db.analytics().await.unwrap();
        assert_eq!(report.total_responses, 1);
        assert_eq!(report.questions[0].counts[&AnswerValue::Topp], 1);
    }

    #[tokio::test]
    async fn top_responses_orders_and_bounds() {
        let (_dir, db) = open_test_db().await;
        db.seed("hash").await.unwrap();

        for (name, score) in [
            ("ada", 4),
            ("bel", 9),
            ("cal", 2),
            ("dee", 9),
            ("eli", 7),
            ("fay", 0),
            ("gus", 5),
        ] {
            db.create_response(name, &[], score).await.unwrap();
        }

        let top = db.top_responses(5).await.unwrap();
        assert_eq!(top.len(), 5);
        let scores: Vec<i64> = top.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![9, 9, 7, 5, 4]);
        // Equal scores keep insertion order
        assert_eq!(top[0].name, "bel");
        assert_eq!(top[1].name, "dee");
    }

    #[tokio::test]
    async fn responses_list_newest_first() {
        let (_dir, db) = open_test_db().await;
        db.seed("hash").await.unwrap();

        let first = db.create_response("first", &[], 0).await.unwrap();
        let second = db.create_response("second", &[], 0).await.unwrap();

        let responses = db.list_responses().await.unwrap();
        assert_eq!(responses[0].id, second);
        assert_eq!(responses[1].id, first);
    }

    #[tokio::test]
    async fn analytics_counts_tokens_per_question() {
        let (_dir, db) = open_test_db().await;
        db.seed("hash").await.unwrap();

        db.create_response("a", &[(1, Some("topp".into())), (2, Some("flash".into()))], 5)
            .await
            .unwrap();
        db.create_response("b", &[(1, Some("topp".into())), (2, None)], 2)
            .await
            .unwrap();
        // Answer to a question that no longer exists
        db.create_response("c", &[(99, Some("flash".into()))], 3)
            .await
            .unwrap();

        let report = db.analytics().await.unwrap();
        assert_eq!(report.total_responses, 3);
        assert_eq!(report.questions.len(), 5);

        let q1 = &report.questions[0];
        assert_eq!(q1.question_id, 1);
        assert_eq!(q1.counts[&AnswerValue::Topp], 2);
        assert_eq!(q1.counts[&AnswerValue::Flash], 0);
        assert_eq!(q1.total, 2);

        let q2 = &report.questions[1];
        assert_eq!(q2.counts[&AnswerValue::Flash], 1);
        assert_eq!(q2.total, 1);

        // Zero-filled counts for questions nobody answered
        let q5 = &report.questions[4];
        assert_eq!(q5.counts[&AnswerValue::Topp], 0);
        assert_eq!(q5.total, 0);
    }
}
