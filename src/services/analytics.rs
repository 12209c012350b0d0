// src/services/analytics.rs

use std::collections::BTreeMap;

use crate::{
    config::{STRENGTH_THRESHOLD_PERCENT, WEAKNESS_THRESHOLD_PERCENT},
    error::AppError,
    models::{
        analytics::{AnalyticsReport, Prediction, TrendPoint},
        question::Difficulty,
        test_result::{StoredResult, TopicPerformance},
    },
    store::ResultStore,
};

const STUDY_HOURS_PER_WEAK_TOPIC: u32 = 2;

/// Builds a progress report from results ordered oldest first.
pub fn build_report(results: &[StoredResult]) -> AnalyticsReport {
    let mut topic_performance = TopicPerformance::new();
    let mut difficulty_distribution: BTreeMap<Difficulty, u32> = BTreeMap::new();
    let mut answered: u64 = 0;
    let mut time_taken: f64 = 0.0;

    for result in results {
        for (topic, counts) in &result.topic_performance {
            topic_performance.entry(topic.clone()).or_default().merge(counts);
        }
        for difficulty in result.questions.iter().filter_map(|q| q.difficulty) {
            *difficulty_distribution.entry(difficulty).or_default() += 1;
        }
        answered += result.questions.len() as u64;
        time_taken += result.time_taken as f64;
    }

    let topic_accuracy: BTreeMap<String, f64> = topic_performance
        .iter()
        .filter_map(|(topic, counts)| counts.accuracy().map(|acc| (topic.clone(), acc * 100.0)))
        .collect();

    let strengths: Vec<String> = topic_accuracy
        .iter()
        .filter(|(_, pct)| **pct >= STRENGTH_THRESHOLD_PERCENT)
        .map(|(topic, _)| topic.clone())
        .collect();

    let weaknesses: Vec<String> = topic_accuracy
        .iter()
        .filter(|(_, pct)| **pct < WEAKNESS_THRESHOLD_PERCENT)
        .map(|(topic, _)| topic.clone())
        .collect();

    let average_time_per_question = if answered == 0 {
        0.0
    } else {
        time_taken / answered as f64
    };

    let trend: Vec<TrendPoint> = results
        .iter()
        .map(|r| TrendPoint {
            timestamp: r.timestamp,
            score: r.score,
        })
        .collect();

    let prediction = predict(&trend, &weaknesses);

    AnalyticsReport {
        tests_taken: results.len(),
        topic_performance,
        topic_accuracy,
        strengths,
        weaknesses,
        difficulty_distribution,
        average_time_per_question,
        trend,
        prediction,
    }
}

fn predict(trend: &[TrendPoint], weaknesses: &[String]) -> Prediction {
    let scores: Vec<f64> = trend.iter().map(|p| p.score as f64).collect();
    let average = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    // Extrapolate the last step.
    let predicted_score = match scores.as_slice() {
        [.., previous, last] => (last + (last - previous)).clamp(0.0, 100.0),
        _ => average,
    };

    let recommended_difficulty = if average < 50.0 {
        Difficulty::Easy
    } else if average < 75.0 {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    };

    Prediction {
        predicted_score,
        recommended_topics: weaknesses.to_vec(),
        recommended_difficulty,
        estimated_study_hours: weaknesses.len() as u32 * STUDY_HOURS_PER_WEAK_TOPIC,
    }
}

/// Report over a user's stored results, optionally for a single subject.
pub async fn user_report<S>(
    store: &S,
    user_id: &str,
    subject: Option<&str>,
) -> Result<AnalyticsReport, AppError>
where
    S: ResultStore + ?Sized,
{
    let mut history = store.history(user_id).await?;
    if let Some(subject) = subject {
        history.retain(|r| r.subject == subject);
    }
    Ok(build_report(&history))
}
