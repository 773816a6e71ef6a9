//! Prompt builder for rendering answer-generation templates.

use crate::types::BuiltPrompt;
use docqa_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Template for answering from document evidence alone.
const SINGLE_SOURCE_TEMPLATE: &str = "\
Based on the following document content, please answer this question: {{query}}

Document content:
{{primary}}

Provide a clear and accurate answer grounded only in the document content above.";

/// Template for answering from document evidence plus web search evidence.
const COMBINED_TEMPLATE: &str = "\
Please answer this question: {{query}}

Document content:
{{primary}}

Additional information from web search:
{{fallback}}

Instructions:
- Address the question directly
- Combine information from both sources when relevant
- Cite the web search source when you use it
- Keep the answer accurate and clear";

/// System message shared by both prompt shapes.
const SYSTEM_PROMPT: &str = "\
You are a document assistant. Answer the user's question from the evidence \
provided, stating plainly when the evidence does not contain the answer.";

/// Build the single-source prompt from document text and a query.
///
/// The document text is embedded verbatim.
pub fn build_single_source_prompt(primary: &str, query: &str) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building single-source prompt");

    let mut variables = HashMap::new();
    variables.insert("query".to_string(), query.to_string());
    variables.insert("primary".to_string(), primary.to_string());

    let user = render_template(SINGLE_SOURCE_TEMPLATE, &variables)?;

    Ok(BuiltPrompt::new(Some(SYSTEM_PROMPT.to_string()), user, false))
}

/// Build the combined prompt from document text, fallback evidence, and a query.
///
/// Both evidence texts are embedded verbatim; callers rely on this for
/// source attribution in the generated answer.
pub fn build_combined_prompt(primary: &str, fallback: &str, query: &str) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building combined prompt");

    let mut variables = HashMap::new();
    variables.insert("query".to_string(), query.to_string());
    variables.insert("primary".to_string(), primary.to_string());
    variables.insert("fallback".to_string(), fallback.to_string());

    let user = render_template(COMBINED_TEMPLATE, &variables)?;

    Ok(BuiltPrompt::new(Some(SYSTEM_PROMPT.to_string()), user, true))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping; evidence must pass through verbatim
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_source_prompt_embeds_text_verbatim() {
        let built =
            build_single_source_prompt("The sky is blue.", "what color is the sky").unwrap();

        assert!(built.user.contains("The sky is blue."));
        assert!(built.user.contains("what color is the sky"));
        assert!(!built.combined);
        assert!(built.system.is_some());
    }

    #[test]
    fn test_combined_prompt_embeds_both_texts_verbatim() {
        let primary = "Unrelated content about cooking.";
        let fallback = "Source 1: Quantum computing uses qubits. (https://example)";
        let built = build_combined_prompt(primary, fallback, "what is quantum computing").unwrap();

        assert!(built.user.contains(primary));
        assert!(built.user.contains(fallback));
        assert!(built.combined);
    }

    #[test]
    fn test_combined_prompt_carries_instructions() {
        let built = build_combined_prompt("doc", "web", "question").unwrap();

        assert!(built.user.contains("Address the question directly"));
        assert!(built.user.contains("Combine information from both sources"));
        assert!(built.user.contains("Cite the web search source"));
        assert!(built.user.contains("accurate and clear"));
    }

    #[test]
    fn test_no_html_escaping() {
        let built = build_single_source_prompt("a < b && c > d", "compare").unwrap();
        assert!(built.user.contains("a < b && c > d"));
    }

    #[test]
    fn test_handlebars_syntax_in_evidence_is_literal() {
        // Evidence containing braces must not break rendering of the outer template
        let built = build_single_source_prompt("plain {braces} text", "query").unwrap();
        assert!(built.user.contains("plain {braces} text"));
    }
}
