//! External search evidence source.
//!
//! Adapter around a web search backend. Tool isolation rule: any transport or
//! parse failure is swallowed inside the adapter and reported as an empty
//! result set, so a search outage can never abort a pipeline invocation. The
//! orchestrator treats "empty" and "backend unreachable" identically.

use crate::types::EvidenceBlock;
use docqa_core::{AppError, AppResult};
use serde::Deserialize;

/// Default endpoint for the DuckDuckGo Instant Answer API.
const DEFAULT_ENDPOINT: &str = "https://api.duckduckgo.com";

/// A source of fallback (web search) evidence.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Get the provider name (for logging).
    fn provider_name(&self) -> &str;

    /// Search for evidence matching the query.
    ///
    /// Each call is independent; no caching across calls. Implementations
    /// should absorb backend failures and return an empty vector, but the
    /// pipeline also tolerates an `Err` and treats it as empty.
    async fn search(&self, query: &str) -> AppResult<Vec<EvidenceBlock>>;
}

/// DuckDuckGo Instant Answer API response (subset).
#[derive(Debug, Deserialize)]
struct DdgResponse {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,

    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,

    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<DdgTopic>,
}

/// A related topic: either a direct result or a named group of results.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DdgTopic {
    Result {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: Option<String>,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<DdgTopic>,
    },
}

/// Web search client backed by the DuckDuckGo Instant Answer API.
pub struct DuckDuckGoSearch {
    endpoint: String,
    max_results: usize,
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    /// Create a client against the public endpoint.
    pub fn new(max_results: usize) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, max_results)
    }

    /// Create a client with a custom endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>, max_results: usize) -> Self {
        Self {
            endpoint: endpoint.into(),
            max_results,
            client: reqwest::Client::new(),
        }
    }

    /// Perform the HTTP round trip; failures propagate as `AppError::Search`.
    async fn fetch(&self, query: &str) -> AppResult<DdgResponse> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Search(format!(
                "Search backend returned status {}",
                response.status()
            )));
        }

        response
            .json::<DdgResponse>()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse search response: {}", e)))
    }

    /// Flatten the response into evidence blocks, best results first.
    fn collect_blocks(&self, response: DdgResponse) -> Vec<EvidenceBlock> {
        let mut blocks = Vec::new();

        if !response.abstract_text.is_empty() {
            blocks.push(if response.abstract_url.is_empty() {
                EvidenceBlock::new(response.abstract_text)
            } else {
                EvidenceBlock::with_origin(response.abstract_text, response.abstract_url)
            });
        }

        flatten_topics(&response.related_topics, &mut blocks, self.max_results);

        blocks.truncate(self.max_results);
        blocks
    }
}

/// Walk topic groups depth-first, collecting direct results.
fn flatten_topics(topics: &[DdgTopic], blocks: &mut Vec<EvidenceBlock>, limit: usize) {
    for topic in topics {
        if blocks.len() >= limit {
            return;
        }

        match topic {
            DdgTopic::Result { text, first_url } => {
                if !text.is_empty() {
                    blocks.push(EvidenceBlock {
                        text: text.clone(),
                        origin: first_url.clone().filter(|url| !url.is_empty()),
                    });
                }
            }
            DdgTopic::Group { topics } => flatten_topics(topics, blocks, limit),
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn provider_name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str) -> AppResult<Vec<EvidenceBlock>> {
        tracing::info!("Searching web for fallback evidence");
        tracing::debug!("Search query: {}", query);

        match self.fetch(query).await {
            Ok(response) => {
                let blocks = self.collect_blocks(response);
                tracing::info!("Search returned {} evidence blocks", blocks.len());
                Ok(blocks)
            }
            Err(e) => {
                // Swallow the failure; an unreachable backend is the same as
                // an empty result from the pipeline's point of view
                tracing::warn!("Search unavailable, continuing without fallback: {}", e);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> DdgResponse {
        serde_json::from_str(
            r#"{
                "AbstractText": "Quantum computing uses qubits.",
                "AbstractURL": "https://example.org/quantum",
                "RelatedTopics": [
                    {"Text": "Qubit - basic unit of quantum information", "FirstURL": "https://example.org/qubit"},
                    {"Topics": [
                        {"Text": "Nested topic", "FirstURL": "https://example.org/nested"}
                    ]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_collect_blocks_orders_abstract_first() {
        let search = DuckDuckGoSearch::new(3);
        let blocks = search.collect_blocks(sample_response());

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].text, "Quantum computing uses qubits.");
        assert_eq!(blocks[0].origin.as_deref(), Some("https://example.org/quantum"));
        assert_eq!(blocks[2].text, "Nested topic");
    }

    #[test]
    fn test_collect_blocks_respects_limit() {
        let search = DuckDuckGoSearch::new(1);
        let blocks = search.collect_blocks(sample_response());

        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_collect_blocks_empty_response() {
        let search = DuckDuckGoSearch::new(2);
        let response: DdgResponse = serde_json::from_str("{}").unwrap();
        let blocks = search.collect_blocks(response);

        assert!(blocks.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_yields_empty() {
        // Port 9 is the discard service; nothing is listening
        let search = DuckDuckGoSearch::with_endpoint("http://127.0.0.1:9", 2);
        let blocks = search.search("anything").await.unwrap();

        assert!(blocks.is_empty());
    }
}
