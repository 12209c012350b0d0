// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;

/// Accuracy assumed for a topic the user has never been tested on.
pub const DEFAULT_TOPIC_ACCURACY: f64 = 0.7;

/// Default and maximum page size for result history listings.
pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Topic accuracy thresholds (percent) used by the analytics report.
pub const STRENGTH_THRESHOLD_PERCENT: f64 = 70.0;
pub const WEAKNESS_THRESHOLD_PERCENT: f64 = 50.0;

/// Which persistence backend the service runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    /// Question type tags a test config may ask for.
    pub allowed_question_types: Vec<String>,
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            database_url: None,
            rust_log: "info".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            allowed_question_types: vec!["objective".to_string(), "subjective".to_string()],
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            _ => StoreBackend::Postgres,
        };

        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            panic!("DATABASE_URL must be set when STORE_BACKEND=postgres");
        }

        let rust_log = env::var("RUST_LOG").unwrap_or(defaults.rust_log);

        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|addr| addr.parse().ok())
            .unwrap_or(defaults.bind_addr);

        let allowed_question_types = env::var("ALLOWED_QUESTION_TYPES")
            .map(|raw| split_list(&raw))
            .ok()
            .filter(|types| !types.is_empty())
            .unwrap_or(defaults.allowed_question_types);

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| split_list(&raw))
            .unwrap_or(defaults.cors_origins);

        Self {
            store_backend,
            database_url,
            rust_log,
            bind_addr,
            allowed_question_types,
            cors_origins,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
