// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, prelude::FromRow, types::Json};

use crate::{
    error::AppError,
    models::{
        question::{Difficulty, Question, QuestionFilter, TopicSummary},
        test_result::{AnsweredQuestion, NewStoredResult, StoredResult, TopicPerformance},
    },
    store::{QuestionStore, ResultStore},
};

/// Represents the 'questions' table in the database.
#[derive(Debug, FromRow)]
struct QuestionRow {
    id: i64,
    subject: String,
    topic: String,
    difficulty: String,
    /// Mapped from the database column 'type' since `type` is a reserved keyword in Rust.
    #[sqlx(rename = "type")]
    question_type: String,
    question: String,
    /// Stored as a JSON array in the database.
    options: Json<Vec<String>>,
    correct_answer: String,
    explanation: Option<String>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = AppError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let difficulty = row.difficulty.parse::<Difficulty>().map_err(|e| {
            AppError::StoreUnavailable(format!("question {}: {}", row.id, e))
        })?;

        Ok(Question {
            id: row.id,
            subject: row.subject,
            topic: row.topic,
            difficulty,
            question_type: row.question_type,
            question: row.question,
            options: row.options.0,
            correct_answer: row.correct_answer,
            explanation: row.explanation,
        })
    }
}

/// Represents the 'test_results' table in the database.
#[derive(Debug, FromRow)]
struct ResultRow {
    id: i64,
    user_id: String,
    subject: String,
    questions: Json<Vec<AnsweredQuestion>>,
    score: i64,
    time_taken: i64,
    topic_performance: Json<TopicPerformance>,
    improvement: i64,
    recorded_at: chrono::DateTime<chrono::Utc>,
}

impl From<ResultRow> for StoredResult {
    fn from(row: ResultRow) -> Self {
        StoredResult {
            id: row.id,
            user_id: row.user_id,
            subject: row.subject,
            questions: row.questions.0,
            score: row.score,
            time_taken: row.time_taken,
            topic_performance: row.topic_performance.0,
            improvement: row.improvement,
            timestamp: row.recorded_at,
        }
    }
}

const RESULT_COLUMNS: &str = "id, user_id, subject, questions, score, time_taken, \
                              topic_performance, improvement, recorded_at";

/// Converts a sample size into a SQL `LIMIT` value.
fn sql_limit(count: usize) -> Result<i64, AppError> {
    i64::try_from(count).map_err(|_| {
        AppError::InvalidConfiguration(format!("Sample size {} is out of range", count))
    })
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionStore for PgStore {
    async fn sample(&self, filter: &QuestionFilter, count: usize) -> Result<Vec<Question>, AppError> {
        let limit = sql_limit(count)?;
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT
                id, subject, topic, difficulty, type,
                question, options, correct_answer, explanation
            FROM questions
            WHERE topic = $1
              AND difficulty = $2
              AND type = ANY($3)
              AND ($4::TEXT IS NULL OR subject = $4)
            ORDER BY RANDOM()
            LIMIT $5
            "#,
        )
        .bind(&filter.topic)
        .bind(filter.difficulty.as_str())
        .bind(&filter.types)
        .bind(filter.subject.as_deref())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to sample questions for {}/{}: {:?}",
                filter.topic,
                filter.difficulty,
                e
            );
            AppError::from(e)
        })?;

        rows.into_iter().map(Question::try_from).collect()
    }

    async fn subjects(&self) -> Result<Vec<String>, AppError> {
        let subjects = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT subject FROM questions ORDER BY subject",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    async fn topics(&self, subject: &str) -> Result<Vec<TopicSummary>, AppError> {
        let topics = sqlx::query_as::<_, TopicSummary>(
            r#"
            SELECT topic, COUNT(*) AS question_count
            FROM questions
            WHERE subject = $1
            GROUP BY topic
            ORDER BY topic
            "#,
        )
        .bind(subject)
        .fetch_all(&self.pool)
        .await?;

        Ok(topics)
    }
}

#[async_trait]
impl ResultStore for PgStore {
    async fn insert(&self, result: NewStoredResult) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO test_results (
                user_id, subject, questions, score, time_taken,
                topic_performance, improvement, recorded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&result.user_id)
        .bind(&result.subject)
        .bind(Json(&result.questions))
        .bind(result.score)
        .bind(result.time_taken)
        .bind(Json(&result.topic_performance))
        .bind(result.improvement)
        .bind(result.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert test result: {:?}", e);
            AppError::from(e)
        })?;

        Ok(id)
    }

    async fn latest(&self, user_id: &str, subject: &str) -> Result<Option<StoredResult>, AppError> {
        let row = sqlx::query_as::<_, ResultRow>(&format!(
            "SELECT {RESULT_COLUMNS} FROM test_results \
             WHERE user_id = $1 AND subject = $2 \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT 1"
        ))
        .bind(user_id)
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StoredResult::from))
    }

    async fn history(&self, user_id: &str) -> Result<Vec<StoredResult>, AppError> {
        let rows = sqlx::query_as::<_, ResultRow>(&format!(
            "SELECT {RESULT_COLUMNS} FROM test_results \
             WHERE user_id = $1 \
             ORDER BY recorded_at ASC, id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredResult::from).collect())
    }

    async fn list(
        &self,
        user_id: &str,
        subject: Option<&str>,
        limit: i64,
    ) -> Result<Vec<StoredResult>, AppError> {
        let rows = sqlx::query_as::<_, ResultRow>(&format!(
            "SELECT {RESULT_COLUMNS} FROM test_results \
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR subject = $2) \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT $3"
        ))
        .bind(user_id)
        .bind(subject)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredResult::from).collect())
    }
}
