// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{analytics, catalog, generate, results},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (tests, results, analytics, subjects).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store handle and configuration).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let test_routes = Router::new().route("/generate", post(generate::generate_test));

    let result_routes = Router::new()
        .route("/", post(results::submit_results))
        .route("/{user_id}", get(results::list_results));

    let analytics_routes = Router::new().route("/{user_id}", get(analytics::get_analytics));

    let subject_routes = Router::new()
        .route("/", get(catalog::list_subjects))
        .route("/{subject}/topics", get(catalog::list_topics));

    Router::new()
        .route("/api/health", get(catalog::health))
        .nest("/api/tests", test_routes)
        .nest("/api/results", result_routes)
        .nest("/api/analytics", analytics_routes)
        .nest("/api/subjects", subject_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
