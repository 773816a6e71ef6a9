//! Command handlers for the docqa CLI.

pub mod ask;

// Re-export command types for convenience
pub use ask::AskCommand;
