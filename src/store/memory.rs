// src/store/memory.rs

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use rand::seq::IteratorRandom;

use crate::{
    error::AppError,
    models::{
        question::{Question, QuestionFilter, TopicSummary},
        test_result::{NewStoredResult, StoredResult},
    },
    store::{QuestionStore, ResultStore},
};

/// In-process store for local runs and tests. Contents are lost on shutdown.
#[derive(Default)]
pub struct MemoryStore {
    questions: RwLock<Vec<Question>>,
    results: RwLock<Vec<StoredResult>>,
    next_question_id: AtomicI64,
    next_result_id: AtomicI64,
}

fn poisoned<T>(_: PoisonError<T>) -> AppError {
    AppError::StoreUnavailable("in-memory store lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a question into the bank, assigning it a fresh id.
    pub fn add_question(&self, mut question: Question) -> Result<i64, AppError> {
        let id = self.next_question_id.fetch_add(1, Ordering::SeqCst) + 1;
        question.id = id;
        self.questions.write().map_err(poisoned)?.push(question);
        Ok(id)
    }

    pub fn result_count(&self) -> Result<usize, AppError> {
        Ok(self.results.read().map_err(poisoned)?.len())
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn sample(&self, filter: &QuestionFilter, count: usize) -> Result<Vec<Question>, AppError> {
        let questions = self.questions.read().map_err(poisoned)?;
        let picked = questions
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .choose_multiple(&mut rand::thread_rng(), count);
        Ok(picked)
    }

    async fn subjects(&self) -> Result<Vec<String>, AppError> {
        let questions = self.questions.read().map_err(poisoned)?;
        let subjects: BTreeSet<&str> = questions.iter().map(|q| q.subject.as_str()).collect();
        Ok(subjects.into_iter().map(str::to_string).collect())
    }

    async fn topics(&self, subject: &str) -> Result<Vec<TopicSummary>, AppError> {
        let questions = self.questions.read().map_err(poisoned)?;
        let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
        for q in questions.iter().filter(|q| q.subject == subject) {
            *counts.entry(q.topic.as_str()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(topic, question_count)| TopicSummary {
                topic: topic.to_string(),
                question_count,
            })
            .collect())
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn insert(&self, result: NewStoredResult) -> Result<i64, AppError> {
        let mut results = self.results.write().map_err(poisoned)?;
        let id = self.next_result_id.fetch_add(1, Ordering::SeqCst) + 1;
        results.push(StoredResult::from_new(id, result));
        Ok(id)
    }

    async fn latest(&self, user_id: &str, subject: &str) -> Result<Option<StoredResult>, AppError> {
        let results = self.results.read().map_err(poisoned)?;
        Ok(results
            .iter()
            .filter(|r| r.user_id == user_id && r.subject == subject)
            .max_by_key(|r| (r.timestamp, r.id))
            .cloned())
    }

    async fn history(&self, user_id: &str) -> Result<Vec<StoredResult>, AppError> {
        let results = self.results.read().map_err(poisoned)?;
        let mut history: Vec<StoredResult> = results
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        history.sort_by_key(|r| (r.timestamp, r.id));
        Ok(history)
    }

    async fn list(
        &self,
        user_id: &str,
        subject: Option<&str>,
        limit: i64,
    ) -> Result<Vec<StoredResult>, AppError> {
        let results = self.results.read().map_err(poisoned)?;
        let mut listed: Vec<StoredResult> = results
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| subject.is_none_or(|s| r.subject == s))
            .cloned()
            .collect();
        listed.sort_by_key(|r| std::cmp::Reverse((r.timestamp, r.id)));
        listed.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(listed)
    }
}
