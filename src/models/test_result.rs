// src/models/test_result.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::Difficulty;

/// One question of a submitted test, as the user answered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    /// Bank id of the question, when the client echoes it back.
    #[serde(default)]
    pub question_id: Option<i64>,

    pub topic: String,

    #[serde(default)]
    pub difficulty: Option<Difficulty>,

    /// `None` when the question was left unanswered.
    #[serde(default)]
    pub selected_answer: Option<String>,

    pub correct_answer: String,
}

impl AnsweredQuestion {
    pub fn is_correct(&self) -> bool {
        self.selected_answer.as_deref() == Some(self.correct_answer.as_str())
    }
}

/// DTO for submitting a completed test.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TestResults {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,

    #[validate(length(min = 1, max = 64))]
    pub subject: String,

    pub questions: Vec<AnsweredQuestion>,

    #[validate(range(min = 0, max = 1_000_000))]
    pub score: i64,

    /// Seconds spent on the test, at most one week.
    #[validate(range(min = 0, max = 604_800))]
    pub time_taken: i64,
}

/// Correct/total counters for one topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTally {
    pub correct: u32,
    pub total: u32,
}

impl TopicTally {
    /// Fraction answered correctly, or `None` when nothing was observed.
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(f64::from(self.correct) / f64::from(self.total))
        }
    }

    pub fn merge(&mut self, other: &TopicTally) {
        self.correct += other.correct;
        self.total += other.total;
    }
}

/// Topic name to tally. Ordered so stored documents are stable.
pub type TopicPerformance = BTreeMap<String, TopicTally>;

/// A result ready to be written, before the store assigns an id.
#[derive(Debug, Clone, Serialize)]
pub struct NewStoredResult {
    pub user_id: String,
    pub subject: String,
    pub questions: Vec<AnsweredQuestion>,
    pub score: i64,
    pub time_taken: i64,
    pub topic_performance: TopicPerformance,
    pub improvement: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// A persisted test result. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub id: i64,
    pub user_id: String,
    pub subject: String,
    pub questions: Vec<AnsweredQuestion>,
    pub score: i64,
    pub time_taken: i64,
    pub topic_performance: TopicPerformance,
    pub improvement: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl StoredResult {
    pub fn from_new(id: i64, new: NewStoredResult) -> Self {
        Self {
            id,
            user_id: new.user_id,
            subject: new.subject,
            questions: new.questions,
            score: new.score,
            time_taken: new.time_taken,
            topic_performance: new.topic_performance,
            improvement: new.improvement,
            timestamp: new.timestamp,
        }
    }
}

/// Query parameters for listing a user's results.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub subject: Option<String>,
    pub limit: Option<i64>,
}
