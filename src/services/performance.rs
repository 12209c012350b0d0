// src/services/performance.rs

use std::collections::HashMap;

use crate::{
    error::AppError,
    models::test_result::{AnsweredQuestion, StoredResult, TopicPerformance},
    store::ResultStore,
};

/// Counts correct and total answers per topic.
pub fn tally<'a, I>(questions: I) -> TopicPerformance
where
    I: IntoIterator<Item = &'a AnsweredQuestion>,
{
    let mut performance = TopicPerformance::new();
    for question in questions {
        let entry = performance.entry(question.topic.clone()).or_default();
        entry.total += 1;
        if question.is_correct() {
            entry.correct += 1;
        }
    }
    performance
}

/// Per-topic accuracy in [0, 1] over every answered question of `results`.
/// Topics never observed are absent.
pub fn accuracy_by_topic(results: &[StoredResult]) -> HashMap<String, f64> {
    tally(results.iter().flat_map(|r| r.questions.iter()))
        .into_iter()
        .filter_map(|(topic, counts)| counts.accuracy().map(|acc| (topic, acc)))
        .collect()
}

/// Loads the user's history and computes their per-topic accuracy.
pub async fn analyze<S>(store: &S, user_id: &str) -> Result<HashMap<String, f64>, AppError>
where
    S: ResultStore + ?Sized,
{
    let history = store.history(user_id).await?;
    let accuracy = accuracy_by_topic(&history);
    tracing::debug!(
        "Analyzed {} past results of user {} across {} topics",
        history.len(),
        user_id,
        accuracy.len()
    );
    Ok(accuracy)
}
