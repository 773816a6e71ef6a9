//! Ask command handler.
//!
//! Establishes a document in a session, runs one pipeline invocation, and
//! renders the result. All status presentation lives here; the pipeline
//! itself stays free of display concerns.

use clap::Args;
use docqa_core::{config::AppConfig, AppError, AppResult};
use docqa_evidence::{DocumentSession, DuckDuckGoSearch};
use docqa_llm::create_client;
use docqa_pipeline::{AnswerGenerator, Pipeline};
use std::path::PathBuf;
use std::sync::Arc;

/// Ask a question about a document
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Path to the document (markdown, HTML, or plain text)
    #[arg(short, long)]
    pub document: PathBuf,

    /// Relevance threshold override (0.0 - 1.0)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Maximum web search results merged into the fallback prompt
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Maximum tokens in the generated answer
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Temperature for answer generation (0.0 - 2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Output as JSON with provenance flags
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let mut policy = config.policy;

        if let Some(threshold) = self.threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(AppError::Config(format!(
                    "Relevance threshold must be in [0, 1], got {}",
                    threshold
                )));
            }
            policy.relevance_threshold = threshold;
        }

        if let Some(max_results) = self.max_results {
            policy.max_search_results = max_results;
        }

        config.validate()?;

        // Establish the document for this session
        let session = Arc::new(DocumentSession::new());
        session.establish_file(&self.document)?;

        // External search adapter
        let search = match config.search_endpoint.as_deref() {
            Some(endpoint) => DuckDuckGoSearch::with_endpoint(endpoint, policy.max_search_results),
            None => DuckDuckGoSearch::new(policy.max_search_results),
        };

        // Generation backend
        let endpoint = config.resolve_endpoint(&config.provider);
        let api_key = config.resolve_api_key(&config.provider);

        let client = create_client(&config.provider, endpoint.as_deref(), api_key.as_deref())
            .map_err(AppError::Config)?;

        let mut generator = AnswerGenerator::new(client, &config.model);

        if let Some(max_tokens) = self.max_tokens {
            generator = generator.with_max_tokens(max_tokens);
        }

        if let Some(temperature) = self.temperature {
            generator = generator.with_temperature(temperature);
        }

        // Run one pipeline invocation
        let pipeline = Pipeline::new(session, Arc::new(search), Arc::new(generator), policy);
        let result = pipeline.run(&self.question).await?;

        // Render
        if self.json {
            let output = serde_json::json!({
                "answer": result.answer_text,
                "usedFallback": result.used_fallback,
                "usedPrimaryEvidence": result.used_primary_evidence,
                "provider": config.provider,
                "model": config.model,
            });

            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("{}", result.answer_text);
        }

        Ok(())
    }
}
