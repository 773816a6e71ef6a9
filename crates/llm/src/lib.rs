//! Generation backend adapter for the docqa pipeline.
//!
//! This crate provides a provider-agnostic abstraction for language-model
//! completion. The pipeline treats generation as a blocking prompt-to-text
//! call; transport and quota failures surface as `AppError::Llm` and are
//! converted to user-facing apology text one layer up, in the answer
//! generator.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - Future: OpenAI, Anthropic
//!
//! # Example
//! ```no_run
//! use docqa_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::OllamaClient;
