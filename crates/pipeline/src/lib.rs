//! Query-to-answer pipeline for document question answering.
//!
//! One invocation runs a fixed sequence: retrieve document text, classify its
//! relevance to the query, conditionally fetch web search fallback evidence,
//! and generate an answer. The orchestrator owns the branching policy; the
//! classifier is a pure lexical scorer; the generator fails closed into
//! apology text rather than propagating backend errors.
//!
//! Degrade order: document alone → document plus search evidence →
//! best-effort from the document with a disclaimer → apology. Only a missing
//! document (or an empty query) aborts an invocation.

pub mod generator;
pub mod orchestrator;
pub mod relevance;
pub mod types;

// Re-export commonly used types
pub use generator::{AnswerGenerator, Generator, GENERATION_APOLOGY};
pub use orchestrator::Pipeline;
pub use relevance::{classify, RelevanceVerdict};
pub use types::PipelineResult;
