//! Docqa Core Library
//!
//! This crate provides the foundational utilities for the docqa pipeline:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, PipelinePolicy};
pub use error::{AppError, AppResult};
