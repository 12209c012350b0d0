// src/services/mod.rs

pub mod analytics;
pub mod performance;
pub mod progress;
pub mod recorder;
pub mod selector;
