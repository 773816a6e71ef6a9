//! Evidence types shared by document and search sources.

use serde::{Deserialize, Serialize};

/// A unit of evidence: text plus an optional origin reference.
///
/// Blocks are immutable once produced and live only for the duration of one
/// pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceBlock {
    /// Evidence text
    pub text: String,

    /// Human-readable source identifier (e.g., a URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl EvidenceBlock {
    /// Create an evidence block without an origin reference.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: None,
        }
    }

    /// Create an evidence block with an origin reference.
    pub fn with_origin(text: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: Some(origin.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_constructors() {
        let plain = EvidenceBlock::new("snippet");
        assert_eq!(plain.text, "snippet");
        assert!(plain.origin.is_none());

        let sourced = EvidenceBlock::with_origin("snippet", "https://example.com");
        assert_eq!(sourced.origin.as_deref(), Some("https://example.com"));
    }
}
