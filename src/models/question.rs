// src/models/question.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Difficulty tier of a question in the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// A question as served to the test taker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    pub subject: String,

    pub topic: String,

    pub difficulty: Difficulty,

    /// Question type tag, e.g. 'objective' or 'subjective'.
    /// Serialized as `type` since that is a reserved keyword in Rust.
    #[serde(rename = "type")]
    pub question_type: String,

    /// The text content of the question.
    pub question: String,

    /// Answer options. Empty for free-form questions.
    #[serde(default)]
    pub options: Vec<String>,

    pub correct_answer: String,

    pub explanation: Option<String>,
}

/// Filter used when sampling the question bank.
#[derive(Debug, Clone)]
pub struct QuestionFilter {
    pub subject: Option<String>,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Matches when the question type is any of these.
    pub types: Vec<String>,
}

impl QuestionFilter {
    pub fn matches(&self, question: &Question) -> bool {
        question.topic == self.topic
            && question.difficulty == self.difficulty
            && self.types.iter().any(|t| *t == question.question_type)
            && self
                .subject
                .as_ref()
                .is_none_or(|subject| *subject == question.subject)
    }
}

/// A topic of a subject along with how many questions the bank holds for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TopicSummary {
    pub topic: String,
    pub question_count: i64,
}

/// A topic's size together with how many of its questions a user has answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicProgress {
    pub topic: String,
    pub question_count: i64,
    pub completed_questions: i64,
}

/// Query parameters of the topic listing.
#[derive(Debug, Deserialize)]
pub struct TopicParams {
    pub user_id: Option<String>,
}
