// src/handlers/generate.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    config::Config,
    error::AppError,
    models::test_config::{GenerateParams, TestConfig},
    services::selector::select_questions,
    store::SharedStore,
};

/// Generates an adaptive test for a user.
///
/// * Rejects invalid configs before touching the store.
/// * Difficulty mix per topic follows the user's past accuracy on it.
/// * May return fewer questions than requested when the bank runs short.
pub async fn generate_test(
    State(store): State<SharedStore>,
    State(config): State<Config>,
    Query(params): Query<GenerateParams>,
    Json(test_config): Json<TestConfig>,
) -> Result<impl IntoResponse, AppError> {
    if params.user_id.trim().is_empty() {
        return Err(AppError::InvalidConfiguration("user_id is required".to_string()));
    }

    let questions = select_questions(
        store.as_ref(),
        &params.user_id,
        &test_config,
        &config.allowed_question_types,
    )
    .await?;

    Ok(Json(questions))
}
