//! Answer generation over one or two evidence blocks.
//!
//! Delegates to the LLM backend through `docqa_llm::LlmClient`. The prompt
//! shape depends on whether fallback evidence is present. This is the one
//! place a backend failure is converted from an error into a normal return
//! value: the generator fails closed into a fixed apology string.

use docqa_core::AppResult;
use docqa_llm::{LlmClient, LlmRequest};
use docqa_prompt::{build_combined_prompt, build_single_source_prompt};
use std::sync::Arc;

/// Fixed user-facing text returned when the generation backend fails.
pub const GENERATION_APOLOGY: &str =
    "Sorry, I encountered an error while generating the response.";

/// Generates a natural-language answer from evidence and a query.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer.
    ///
    /// An empty `fallback_text` selects the single-source prompt. Backend
    /// failures are absorbed into apology text; only prompt-assembly failure
    /// surfaces as `Err`.
    async fn generate(&self, primary_text: &str, query: &str, fallback_text: &str)
        -> AppResult<String>;
}

/// LLM-backed answer generator.
pub struct AnswerGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl AnswerGenerator {
    /// Create a generator for the given client and model.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Set the maximum tokens for generated answers.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[async_trait::async_trait]
impl Generator for AnswerGenerator {
    async fn generate(
        &self,
        primary_text: &str,
        query: &str,
        fallback_text: &str,
    ) -> AppResult<String> {
        let prompt = if fallback_text.is_empty() {
            build_single_source_prompt(primary_text, query)?
        } else {
            build_combined_prompt(primary_text, fallback_text, query)?
        };

        let mut request = LlmRequest::new(prompt.user, &self.model);

        if let Some(system) = prompt.system {
            request = request.with_system(system);
        }

        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        tracing::info!(
            "Generating answer via {} (combined: {})",
            self.client.provider_name(),
            prompt.combined
        );

        match self.client.complete(&request).await {
            Ok(response) => Ok(response.content),
            Err(e) => {
                // Fail closed: the caller always gets answer text
                tracing::warn!("Generation backend failed: {}", e);
                Ok(GENERATION_APOLOGY.to_string())
            }
        }
    }
}
