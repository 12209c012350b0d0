// src/handlers/results.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    config::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT},
    error::AppError,
    models::test_result::{HistoryParams, TestResults},
    services::recorder::record_results,
    store::{ResultStore, SharedStore},
};

/// Stores a completed test and returns the id of the new record.
pub async fn submit_results(
    State(store): State<SharedStore>,
    Json(req): Json<TestResults>,
) -> Result<impl IntoResponse, AppError> {
    let id = record_results(store.as_ref(), req).await?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Lists a user's stored results, newest first.
pub async fn list_results(
    State(store): State<SharedStore>,
    Path(user_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let results = store
        .list(&user_id, params.subject.as_deref(), limit)
        .await?;

    Ok(Json(results))
}
