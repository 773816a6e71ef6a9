//! Prompt types for the docqa pipeline.

use serde::{Deserialize, Serialize};

/// A rendered prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Optional system message
    pub system: Option<String>,

    /// User message with evidence and question embedded
    pub user: String,

    /// Whether fallback evidence was merged into the prompt
    pub combined: bool,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(system: Option<String>, user: String, combined: bool) -> Self {
        Self {
            system,
            user,
            combined,
        }
    }
}
