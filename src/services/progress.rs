// src/services/progress.rs

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::AppError,
    models::{
        question::{TopicProgress, TopicSummary},
        test_result::StoredResult,
    },
    store::{QuestionStore, ResultStore},
};

/// Distinct bank questions answered per topic across `results`.
///
/// Only answers that carry a `question_id` and a selected answer count, so
/// retaking the same question never counts twice.
pub fn completed_by_topic(results: &[StoredResult]) -> BTreeMap<&str, BTreeSet<i64>> {
    let mut completed: BTreeMap<&str, BTreeSet<i64>> = BTreeMap::new();
    for answer in results.iter().flat_map(|r| r.questions.iter()) {
        if let (Some(id), Some(_)) = (answer.question_id, answer.selected_answer.as_ref()) {
            completed.entry(answer.topic.as_str()).or_default().insert(id);
        }
    }
    completed
}

/// Joins the catalog of a subject with one user's answered questions.
pub fn merge_progress(topics: Vec<TopicSummary>, results: &[StoredResult]) -> Vec<TopicProgress> {
    let completed = completed_by_topic(results);
    topics
        .into_iter()
        .map(|summary| {
            let done = completed
                .get(summary.topic.as_str())
                .map_or(0, |ids| ids.len() as i64);
            TopicProgress {
                completed_questions: done.min(summary.question_count),
                topic: summary.topic,
                question_count: summary.question_count,
            }
        })
        .collect()
}

/// Topics of `subject` with their question counts and, when `user_id` is given,
/// how many of those questions the user has already answered.
pub async fn topic_progress<S>(
    store: &S,
    subject: &str,
    user_id: Option<&str>,
) -> Result<Vec<TopicProgress>, AppError>
where
    S: QuestionStore + ResultStore + ?Sized,
{
    let topics = store.topics(subject).await?;

    let mut results = match user_id {
        Some(user_id) => store.history(user_id).await?,
        None => Vec::new(),
    };
    results.retain(|r| r.subject == subject);

    Ok(merge_progress(topics, &results))
}
