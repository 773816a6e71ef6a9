//! Pipeline orchestration: the query-to-answer state machine.
//!
//! One invocation runs Retrieving → Classifying → {FallbackSearch | Skip} →
//! Generating → Done, exactly once, with no retries. Stages are strictly
//! sequential because each stage's decision gates the next. The only errors
//! that cross this boundary are precondition failures (empty query, no
//! document, unreadable document); everything downstream degrades into a
//! valid `PipelineResult`.

use crate::generator::Generator;
use crate::relevance::classify;
use crate::types::PipelineResult;
use docqa_core::config::PipelinePolicy;
use docqa_core::{AppError, AppResult};
use docqa_evidence::{DocumentSession, EvidenceBlock, SearchProvider};
use std::sync::Arc;

/// Marker prepended when the answer merges document and search evidence.
const COMBINED_MARKER: &str = "[Combined response using document and web sources]\n\n";

/// Disclaimer prepended to best-effort answers after a negative verdict.
const BEST_EFFORT_DISCLAIMER: &str =
    "[Note: the document may not contain relevant information for this question]\n\n";

/// Final apology when even best-effort generation could not produce output.
const FINAL_APOLOGY: &str =
    "I could not find relevant information to answer your question. Please try rephrasing it.";

/// The query-to-answer pipeline.
///
/// Holds the established-document session, the search provider, the answer
/// generator, and the decision policy. Invocations share no mutable state;
/// each one snapshots the document handle at start and owns its own evidence.
pub struct Pipeline {
    session: Arc<DocumentSession>,
    search: Arc<dyn SearchProvider>,
    generator: Arc<dyn Generator>,
    policy: PipelinePolicy,
}

impl Pipeline {
    /// Create a pipeline over the given collaborators.
    pub fn new(
        session: Arc<DocumentSession>,
        search: Arc<dyn SearchProvider>,
        generator: Arc<dyn Generator>,
        policy: PipelinePolicy,
    ) -> Self {
        Self {
            session,
            search,
            generator,
            policy,
        }
    }

    /// Run one query through the pipeline.
    ///
    /// # Errors
    /// - `AppError::EmptyQuery` if the query is empty or whitespace-only
    /// - `AppError::NoDocument` if no document has been established
    /// - `AppError::Document` if extraction fails
    pub async fn run(&self, query: &str) -> AppResult<PipelineResult> {
        if query.trim().is_empty() {
            return Err(AppError::EmptyQuery);
        }

        // Retrieve: snapshot the handle so a concurrent re-establish cannot
        // switch documents mid-invocation
        let document = self.session.snapshot().ok_or(AppError::NoDocument)?;

        tracing::info!("Pipeline invocation for query: {}", query);

        let primary_text = document.extract()?;

        // Classify
        let verdict = classify(&primary_text, query, self.policy.relevance_threshold);

        tracing::info!(
            "Relevance verdict: relevant={}, score={:.3}",
            verdict.relevant,
            verdict.score
        );

        // Fallback decision
        let fallback_text = if verdict.relevant {
            String::new()
        } else {
            self.gather_fallback(query).await
        };

        // Generate and compose. A generation failure on any branch degrades
        // into the final apology; it never crosses the pipeline boundary.
        if !fallback_text.is_empty() {
            tracing::info!("Generating combined answer with fallback evidence");

            return Ok(
                match self
                    .generator
                    .generate(&primary_text, query, &fallback_text)
                    .await
                {
                    Ok(answer) => {
                        PipelineResult::combined(format!("{}{}", COMBINED_MARKER, answer))
                    }
                    Err(e) => apologize("Combined generation failed", e),
                },
            );
        }

        if verdict.relevant {
            tracing::info!("Generating answer from document evidence alone");

            return Ok(match self.generator.generate(&primary_text, query, "").await {
                Ok(answer) => PipelineResult::from_primary(answer),
                Err(e) => apologize("Generation failed", e),
            });
        }

        // Neither tier produced usable evidence: best-effort from the
        // document anyway, flagged as such
        tracing::info!("Generating best-effort answer despite negative verdict");

        Ok(match self.generator.generate(&primary_text, query, "").await {
            Ok(answer) => {
                PipelineResult::best_effort(format!("{}{}", BEST_EFFORT_DISCLAIMER, answer))
            }
            Err(e) => apologize("Best-effort generation failed", e),
        })
    }

    /// Fetch and format fallback evidence for an insufficient document.
    ///
    /// A search failure of any kind is treated as an empty result set; the
    /// pipeline must never abort on a search-layer failure.
    async fn gather_fallback(&self, query: &str) -> String {
        let blocks = match self.search.search(query).await {
            Ok(blocks) => blocks,
            Err(e) => {
                tracing::warn!("Search provider failed, treating as empty: {}", e);
                Vec::new()
            }
        };

        let limited = &blocks[..blocks.len().min(self.policy.max_search_results)];

        format_fallback(limited)
    }
}

/// Degrade a failed generation call into the final apology.
///
/// No evidence backs the answer, so the result carries best-effort
/// provenance flags regardless of which branch failed.
fn apologize(stage: &str, error: AppError) -> PipelineResult {
    tracing::warn!("{}: {}", stage, error);
    PipelineResult::best_effort(FINAL_APOLOGY.to_string())
}

/// Join evidence blocks into a single labeled fallback string.
///
/// Each block gets a human-readable "Source N:" label with its origin
/// appended when present; blocks are separated by blank lines.
fn format_fallback(blocks: &[EvidenceBlock]) -> String {
    blocks
        .iter()
        .enumerate()
        .map(|(i, block)| match &block.origin {
            Some(origin) => format!("Source {}: {} ({})", i + 1, block.text, origin),
            None => format!("Source {}: {}", i + 1, block.text),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
