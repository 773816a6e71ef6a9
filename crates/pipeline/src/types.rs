//! Pipeline output types.

use serde::{Deserialize, Serialize};

/// The outcome of one pipeline invocation.
///
/// Provenance flags let the rendering layer disclose confidence: exactly one
/// of {primary alone, fallback combined with primary, neither} backs the
/// answer text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Final answer text, including any disclaimer or combined-response marker
    pub answer_text: String,

    /// Whether web search evidence was merged into the answer
    pub used_fallback: bool,

    /// Whether the document was judged relevant for the answer
    pub used_primary_evidence: bool,
}

impl PipelineResult {
    /// Answer produced from the document alone.
    pub fn from_primary(answer_text: String) -> Self {
        Self {
            answer_text,
            used_fallback: false,
            used_primary_evidence: true,
        }
    }

    /// Answer produced from document plus fallback evidence.
    pub fn combined(answer_text: String) -> Self {
        Self {
            answer_text,
            used_fallback: true,
            used_primary_evidence: true,
        }
    }

    /// Best-effort answer after both evidence tiers came up short.
    pub fn best_effort(answer_text: String) -> Self {
        Self {
            answer_text,
            used_fallback: false,
            used_primary_evidence: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_flags() {
        let primary = PipelineResult::from_primary("a".into());
        assert!(!primary.used_fallback);
        assert!(primary.used_primary_evidence);

        let combined = PipelineResult::combined("a".into());
        assert!(combined.used_fallback);
        assert!(combined.used_primary_evidence);

        let best_effort = PipelineResult::best_effort("a".into());
        assert!(!best_effort.used_fallback);
        assert!(!best_effort.used_primary_evidence);
    }
}
