// src/models/test_config.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

/// Requested shape of a generated test.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TestConfig {
    /// Restricts sampling to one subject when present.
    #[serde(default)]
    pub subject: Option<String>,

    /// Topics to draw from, processed in the given order.
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 topics are required."))]
    pub topics: Vec<String>,

    #[validate(range(min = 1, max = 1000, message = "question_count must be between 1 and 1000."))]
    pub question_count: i64,

    #[validate(length(min = 1, message = "At least one question type is required."))]
    pub question_types: Vec<String>,
}

impl TestConfig {
    /// Validates the config against the set of question types the service knows about.
    /// Must pass before the question store is touched.
    pub fn check(&self, allowed_types: &[String]) -> Result<(), AppError> {
        self.validate()?;

        if let Some(unknown) = self
            .question_types
            .iter()
            .find(|t| !allowed_types.contains(t))
        {
            return Err(AppError::InvalidConfiguration(format!(
                "Unrecognized question type '{}'",
                unknown
            )));
        }

        if self.topics.iter().any(|topic| topic.trim().is_empty()) {
            return Err(AppError::InvalidConfiguration(
                "Topic names must not be blank".to_string(),
            ));
        }

        Ok(())
    }
}

/// Query parameters of the generate endpoint.
#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    pub user_id: String,
}
