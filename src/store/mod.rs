// src/store/mod.rs

//! Persistence seam of the service.
//!
//! Handlers and services only see these traits; `main` decides which backend
//! sits behind them and hands it to the router once at startup.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        question::{Question, QuestionFilter, TopicSummary},
        test_result::{NewStoredResult, StoredResult},
    },
};

/// Read access to the question bank.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Returns up to `count` distinct random questions matching `filter`.
    /// Fewer are returned when the pool is smaller; an empty pool is not an error.
    async fn sample(&self, filter: &QuestionFilter, count: usize) -> Result<Vec<Question>, AppError>;

    /// Distinct subjects present in the bank, sorted.
    async fn subjects(&self) -> Result<Vec<String>, AppError>;

    /// Topics of a subject with their question counts, sorted by topic.
    async fn topics(&self, subject: &str) -> Result<Vec<TopicSummary>, AppError>;
}

/// Write-once storage of completed test results.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Persists a result and returns its generated id.
    async fn insert(&self, result: NewStoredResult) -> Result<i64, AppError>;

    /// Most recent result of `user_id` for `subject`, by timestamp.
    async fn latest(&self, user_id: &str, subject: &str) -> Result<Option<StoredResult>, AppError>;

    /// Every result of `user_id`, oldest first.
    async fn history(&self, user_id: &str) -> Result<Vec<StoredResult>, AppError>;

    /// Results of `user_id`, newest first, optionally narrowed to one subject.
    async fn list(
        &self,
        user_id: &str,
        subject: Option<&str>,
        limit: i64,
    ) -> Result<Vec<StoredResult>, AppError>;
}

/// A backend serving both the question bank and the result log.
pub trait Store: QuestionStore + ResultStore {}

impl<T: QuestionStore + ResultStore> Store for T {}

pub type SharedStore = Arc<dyn Store>;
