// src/models/analytics.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{question::Difficulty, test_result::TopicPerformance};

/// Score of one stored result, for plotting progress over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub predicted_score: f64,
    pub recommended_topics: Vec<String>,
    pub recommended_difficulty: Difficulty,
    pub estimated_study_hours: u32,
}

/// Aggregated progress report of a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub tests_taken: usize,
    pub topic_performance: TopicPerformance,
    /// Percent correct (0-100) per topic.
    pub topic_accuracy: BTreeMap<String, f64>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub difficulty_distribution: BTreeMap<Difficulty, u32>,
    /// Seconds.
    pub average_time_per_question: f64,
    pub trend: Vec<TrendPoint>,
    pub prediction: Prediction,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsParams {
    pub subject: Option<String>,
}
