// src/services/recorder.rs

use validator::Validate;

use crate::{
    error::AppError,
    models::test_result::{NewStoredResult, TestResults},
    services::performance::tally,
    store::ResultStore,
};

/// Persists a completed test along with its per-topic tally and the score change
/// since the user's previous test of the same subject. Returns the new record's id.
///
/// Exactly one record is written per call; a failed write is returned to the caller
/// and not retried.
pub async fn record_results<S>(store: &S, results: TestResults) -> Result<i64, AppError>
where
    S: ResultStore + ?Sized,
{
    results.validate()?;

    let topic_performance = tally(&results.questions);

    let previous = store.latest(&results.user_id, &results.subject).await?;
    let improvement = previous
        .as_ref()
        .map_or(0, |prev| results.score.saturating_sub(prev.score));

    let record = NewStoredResult {
        user_id: results.user_id,
        subject: results.subject,
        questions: results.questions,
        score: results.score,
        time_taken: results.time_taken,
        topic_performance,
        improvement,
        timestamp: chrono::Utc::now(),
    };

    let user_id = record.user_id.clone();
    let id = store.insert(record).await?;

    tracing::info!(
        "Recorded result {} for user {} (improvement {:+})",
        id,
        user_id,
        improvement
    );

    Ok(id)
}
