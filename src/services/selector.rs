// src/services/selector.rs

use rand::seq::SliceRandom;

use crate::{
    config::DEFAULT_TOPIC_ACCURACY,
    error::AppError,
    models::{
        question::{Difficulty, Question, QuestionFilter},
        test_config::TestConfig,
    },
    services::performance,
    store::{QuestionStore, ResultStore},
};

/// How well a user is doing on a topic, derived from their accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceBucket {
    Struggling,
    Intermediate,
    Advanced,
}

impl PerformanceBucket {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy < 0.4 {
            PerformanceBucket::Struggling
        } else if accuracy < 0.7 {
            PerformanceBucket::Intermediate
        } else {
            PerformanceBucket::Advanced
        }
    }

    /// Share of the topic budget per difficulty, in percent.
    pub fn weights(self) -> [(Difficulty, usize); 3] {
        match self {
            PerformanceBucket::Struggling => [
                (Difficulty::Easy, 60),
                (Difficulty::Medium, 30),
                (Difficulty::Hard, 10),
            ],
            PerformanceBucket::Intermediate => [
                (Difficulty::Easy, 30),
                (Difficulty::Medium, 40),
                (Difficulty::Hard, 30),
            ],
            PerformanceBucket::Advanced => [
                (Difficulty::Easy, 10),
                (Difficulty::Medium, 30),
                (Difficulty::Hard, 60),
            ],
        }
    }
}

/// Questions each topic gets. The remainder of the division is not handed out.
pub fn per_topic_budget(question_count: usize, topic_count: usize) -> usize {
    question_count / topic_count
}

/// Raw number of questions to draw per difficulty, rounded down.
pub fn difficulty_counts(budget: usize, bucket: PerformanceBucket) -> [(Difficulty, usize); 3] {
    bucket
        .weights()
        .map(|(difficulty, percent)| (difficulty, budget * percent / 100))
}

/// Picks questions for `user_id` with a difficulty mix tuned to their past accuracy per topic.
///
/// The result may hold fewer than `question_count` questions when the bank runs
/// short or the budget does not divide evenly; that is not an error.
pub async fn select_questions<S>(
    store: &S,
    user_id: &str,
    config: &TestConfig,
    allowed_types: &[String],
) -> Result<Vec<Question>, AppError>
where
    S: QuestionStore + ResultStore + ?Sized,
{
    config.check(allowed_types)?;

    let question_count = usize::try_from(config.question_count).map_err(|_| {
        AppError::InvalidConfiguration("question_count must be positive.".to_string())
    })?;

    let accuracy_by_topic = performance::analyze(store, user_id).await?;
    let budget = per_topic_budget(question_count, config.topics.len());

    if budget * config.topics.len() < question_count {
        tracing::debug!(
            "Budget of {} per topic leaves {} of {} questions unallocated",
            budget,
            question_count - budget * config.topics.len(),
            question_count
        );
    }

    let mut questions = Vec::new();

    for topic in &config.topics {
        let accuracy = accuracy_by_topic
            .get(topic)
            .copied()
            .unwrap_or(DEFAULT_TOPIC_ACCURACY);
        let bucket = PerformanceBucket::from_accuracy(accuracy);

        tracing::debug!(
            "Topic {} for user {}: accuracy {:.2}, bucket {:?}",
            topic,
            user_id,
            accuracy,
            bucket
        );

        for (difficulty, count) in difficulty_counts(budget, bucket) {
            if count == 0 {
                continue;
            }

            let filter = QuestionFilter {
                subject: config.subject.clone(),
                topic: topic.clone(),
                difficulty,
                types: config.question_types.clone(),
            };
            let drawn = store.sample(&filter, count).await?;

            if drawn.len() < count {
                tracing::warn!(
                    "Question pool for {}/{} short: wanted {}, got {}",
                    topic,
                    difficulty,
                    count,
                    drawn.len()
                );
            }

            questions.extend(drawn);
        }
    }

    questions.shuffle(&mut rand::thread_rng());
    questions.truncate(question_count);

    tracing::info!(
        "Selected {} of {} requested questions for user {}",
        questions.len(),
        question_count,
        user_id
    );

    Ok(questions)
}
