// src/models/mod.rs

pub mod analytics;
pub mod question;
pub mod test_config;
pub mod test_result;
