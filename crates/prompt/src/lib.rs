//! Prompt assembly for the docqa pipeline.
//!
//! This crate renders the two prompt shapes the answer generator uses:
//! a single-source prompt grounded only in document text, and a combined
//! prompt that merges document text with external search evidence.
//! Templates are Handlebars strings; evidence text is embedded verbatim
//! (HTML escaping disabled).

pub mod builder;
pub mod types;

pub use builder::{build_combined_prompt, build_single_source_prompt};
pub use types::BuiltPrompt;
