//! Error types for the docqa pipeline.
//!
//! This module defines a unified error enum covering all error categories in
//! the application: configuration, I/O, document extraction, external search,
//! LLM, and prompt errors, plus the two precondition failures that abort a
//! pipeline invocation (`EmptyQuery`, `NoDocument`).

use thiserror::Error;

/// Unified error type for the docqa pipeline.
///
/// All fallible functions return `Result<T, AppError>`. We never panic —
/// errors must be represented and propagated.
///
/// Only `EmptyQuery`, `NoDocument`, and `Document` cross the orchestrator
/// boundary; search failures degrade to empty evidence and generation
/// failures degrade to apology text (see `docqa-pipeline`).
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The query was empty or whitespace-only
    #[error("Query must not be empty")]
    EmptyQuery,

    /// No document has been established for the session
    #[error("No document has been established")]
    NoDocument,

    /// Document extraction errors
    #[error("Document error: {0}")]
    Document(String),

    /// External search adapter errors (absorbed inside the pipeline)
    #[error("Search error: {0}")]
    Search(String),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
