//! Lexical relevance classification.
//!
//! Decides whether extracted document text is sufficient to answer a query.
//! Pure arithmetic substring matching: no stemming, no fuzzy matching, no
//! semantic similarity, no external calls. Identical inputs always yield the
//! identical verdict.

use serde::{Deserialize, Serialize};

/// The classifier's decision plus the score that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelevanceVerdict {
    /// Whether the text is judged sufficient for the query
    pub relevant: bool,

    /// Fraction of query keywords found in the text, in [0, 1]
    pub score: f64,
}

impl RelevanceVerdict {
    /// The deterministic verdict for a query with no keywords.
    fn not_relevant() -> Self {
        Self {
            relevant: false,
            score: 0.0,
        }
    }
}

/// Classify document text against a query.
///
/// The query is lower-cased and split on whitespace into a keyword set
/// (duplicates allowed). The score is the fraction of keywords occurring as
/// substrings of the lower-cased text; the verdict is relevant iff at least
/// one keyword matched and the score strictly exceeds `threshold`.
///
/// A query that tokenizes to nothing is deterministically not relevant —
/// the division guard for |K| = 0.
pub fn classify(text: &str, query: &str, threshold: f64) -> RelevanceVerdict {
    let query_lower = query.to_lowercase();
    let keywords: Vec<&str> = query_lower.split_whitespace().collect();

    if keywords.is_empty() {
        return RelevanceVerdict::not_relevant();
    }

    let text_lower = text.to_lowercase();

    let matched = keywords
        .iter()
        .filter(|keyword| text_lower.contains(*keyword))
        .count();

    let score = matched as f64 / keywords.len() as f64;
    let keyword_present = matched > 0;

    let verdict = RelevanceVerdict {
        relevant: keyword_present && score > threshold,
        score,
    };

    tracing::debug!(
        "Relevance: {}/{} keywords matched, score {:.3}, relevant {}",
        matched,
        keywords.len(),
        verdict.score,
        verdict.relevant
    );

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 0.3;

    #[test]
    fn test_relevant_document() {
        // "is", "the", "sky" match as substrings (score 0.6); "what" and
        // "color" do not
        let verdict = classify(
            "The sky is blue during the day.",
            "what color is the sky",
            THRESHOLD,
        );

        assert!(verdict.relevant);
        assert!(verdict.score >= 0.3);
    }

    #[test]
    fn test_unrelated_document() {
        let verdict = classify(
            "Unrelated content about cooking.",
            "quantum computing",
            THRESHOLD,
        );

        assert!(!verdict.relevant);
        assert_eq!(verdict.score, 0.0);
    }

    #[test]
    fn test_empty_query_division_guard() {
        let verdict = classify("Some document text.", "   ", THRESHOLD);

        assert!(!verdict.relevant);
        assert_eq!(verdict.score, 0.0);
    }

    #[test]
    fn test_score_range() {
        let queries = [
            "one",
            "one two",
            "one two three four five six",
            "completely unmatched tokens here",
        ];

        for query in queries {
            let verdict = classify("one two three", query, THRESHOLD);
            assert!((0.0..=1.0).contains(&verdict.score), "query: {}", query);
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "The sky is blue during the day.";
        let query = "what color is the sky";

        let first = classify(text, query, THRESHOLD);
        let second = classify(text, query, THRESHOLD);

        assert_eq!(first, second);
    }

    #[test]
    fn test_case_insensitive() {
        let verdict = classify("THE SKY IS BLUE", "the sky", THRESHOLD);
        assert!(verdict.relevant);
        assert_eq!(verdict.score, 1.0);
    }

    #[test]
    fn test_substring_matching_not_word_matching() {
        // "is" occurs inside "this"; substring semantics count it
        let verdict = classify("this", "is", THRESHOLD);
        assert!(verdict.relevant);
        assert_eq!(verdict.score, 1.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Exactly one of two keywords matches: score 0.5 > 0.5 is false
        let verdict = classify("alpha something", "alpha beta", 0.5);
        assert!(!verdict.relevant);
        assert_eq!(verdict.score, 0.5);
    }

    #[test]
    fn test_duplicate_keywords_count_separately() {
        // "sky sky" has |K| = 2, both match
        let verdict = classify("the sky is blue", "sky sky", THRESHOLD);
        assert_eq!(verdict.score, 1.0);
    }
}
