// src/handlers/mod.rs

pub mod analytics;
pub mod catalog;
pub mod generate;
pub mod results;
