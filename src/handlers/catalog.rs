// src/handlers/catalog.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::question::TopicParams,
    services::progress::topic_progress,
    store::{QuestionStore, SharedStore},
};

/// Lists the subjects present in the question bank.
pub async fn list_subjects(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let subjects = store.subjects().await?;

    Ok(Json(subjects))
}

/// Lists the topics of a subject with their question counts, plus the
/// caller's completed count when `user_id` is given.
pub async fn list_topics(
    State(store): State<SharedStore>,
    Path(subject): Path<String>,
    Query(params): Query<TopicParams>,
) -> Result<impl IntoResponse, AppError> {
    let topics = topic_progress(store.as_ref(), &subject, params.user_id.as_deref()).await?;

    Ok(Json(topics))
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
