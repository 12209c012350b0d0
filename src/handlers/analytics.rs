// src/handlers/analytics.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError, models::analytics::AnalyticsParams, services::analytics::user_report,
    store::SharedStore,
};

/// Progress report of a user: strengths, weaknesses, trend and prediction.
pub async fn get_analytics(
    State(store): State<SharedStore>,
    Path(user_id): Path<String>,
    Query(params): Query<AnalyticsParams>,
) -> Result<impl IntoResponse, AppError> {
    let report = user_report(store.as_ref(), &user_id, params.subject.as_deref()).await?;

    Ok(Json(report))
}
