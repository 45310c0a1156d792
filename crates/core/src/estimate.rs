//! Per-model token and cost estimation.
//!
//! The model table is immutable configuration: name, provider, a fixed
//! empirical characters-per-token ratio, prices per million tokens, and the
//! context window. It is initialized once and passed explicitly into the
//! estimator so the pipeline stays a pure function of its inputs.
//!
//! Exact token counting is a capability, not a type branch: a
//! [`TokenCounter`] registered for a provider family replaces the
//! character-ratio heuristic for that family's models and flips `is_exact`.
//! Without one, every model falls back to `ceil(chars / chars_per_token)`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

/// Pricing and sizing data for one model.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model: String,
    pub provider: String,
    /// Empirical characters-per-token ratio for the heuristic estimate.
    pub chars_per_token: f64,
    pub cost_per_million_input: f64,
    pub cost_per_million_output: f64,
    pub context_window: u64,
}

impl ModelConfig {
    fn new(
        model: &str, provider: &str, chars_per_token: f64, cost_per_million_input: f64,
        cost_per_million_output: f64, context_window: u64,
    ) -> Self {
        Self {
            model: model.to_string(),
            provider: provider.to_string(),
            chars_per_token,
            cost_per_million_input,
            cost_per_million_output,
            context_window,
        }
    }
}

/// The ordered, read-only table of models an analysis reports on.
///
/// Output order of [`estimate_models`] always matches catalog order.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelConfig>,
}

impl ModelCatalog {
    /// Builds a catalog from an explicit model list.
    pub fn new(models: Vec<ModelConfig>) -> Self {
        Self { models }
    }

    /// The configured models, in order.
    pub fn models(&self) -> &[ModelConfig] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelCatalog {
    /// The stock catalog: current frontier models with published prices.
    fn default() -> Self {
        Self::new(vec![
            ModelConfig::new("GPT-4o", "OpenAI", 4.0, 2.5, 10.0, 128_000),
            ModelConfig::new("GPT-4o mini", "OpenAI", 4.0, 0.15, 0.6, 128_000),
            ModelConfig::new("Claude 3.5 Sonnet", "Anthropic", 3.5, 3.0, 15.0, 200_000),
            ModelConfig::new("Claude 3.5 Haiku", "Anthropic", 3.5, 0.8, 4.0, 200_000),
            ModelConfig::new("Gemini 2.0 Flash", "Google", 4.2, 0.1, 0.4, 1_000_000),
            ModelConfig::new("Gemini 1.5 Pro", "Google", 4.2, 1.25, 5.0, 2_000_000),
            ModelConfig::new("Llama 3.1 70B", "Meta", 3.8, 0.88, 0.88, 128_000),
            ModelConfig::new("Mistral Large", "Mistral", 3.9, 2.0, 6.0, 128_000),
        ])
    }
}

/// An exact tokenizer for one provider family.
///
/// Implementations wrap whatever external tokenizer the provider publishes;
/// the estimator only needs a count.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }
}

/// Registry of exact tokenizers, keyed by provider name.
///
/// Empty by default; every model then uses the heuristic path.
#[derive(Clone, Default)]
pub struct TokenizerRegistry {
    by_provider: HashMap<String, Arc<dyn TokenCounter>>,
}

impl TokenizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an exact tokenizer for a provider family.
    pub fn register(&mut self, provider: &str, counter: Arc<dyn TokenCounter>) {
        self.by_provider.insert(provider.to_string(), counter);
    }

    /// Looks up the exact tokenizer for a provider, if one was registered.
    pub fn get(&self, provider: &str) -> Option<&Arc<dyn TokenCounter>> {
        self.by_provider.get(provider)
    }
}

impl std::fmt::Debug for TokenizerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenizerRegistry")
            .field("providers", &self.by_provider.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Token and cost estimate for one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelTokenEstimate {
    pub model: String,
    pub provider: String,
    pub tokens_raw: u64,
    pub tokens_cleaned: u64,
    pub cost_per_million_input: f64,
    pub cost_per_million_output: f64,
    pub estimated_input_cost_raw: f64,
    pub estimated_input_cost_cleaned: f64,
    pub context_window: u64,
    pub fits_in_context: bool,
    /// Whether an exact tokenizer produced the counts, as opposed to the
    /// characters-per-token heuristic.
    pub is_exact: bool,
}

/// Estimates tokens and input cost for every configured model.
///
/// Counts are computed separately over the raw HTML and the cleaned text;
/// `fits_in_context` compares the cleaned count against the context window.
/// Output order matches the catalog.
pub fn estimate_models(
    raw_html: &str, cleaned_text: &str, catalog: &ModelCatalog, tokenizers: &TokenizerRegistry,
) -> Vec<ModelTokenEstimate> {
    catalog
        .models()
        .iter()
        .map(|config| {
            let (tokens_raw, tokens_cleaned, is_exact) = match tokenizers.get(&config.provider) {
                Some(counter) => (
                    counter.count(raw_html) as u64,
                    counter.count(cleaned_text) as u64,
                    true,
                ),
                None => (
                    heuristic_tokens(raw_html, config.chars_per_token),
                    heuristic_tokens(cleaned_text, config.chars_per_token),
                    false,
                ),
            };

            ModelTokenEstimate {
                model: config.model.clone(),
                provider: config.provider.clone(),
                tokens_raw,
                tokens_cleaned,
                cost_per_million_input: config.cost_per_million_input,
                cost_per_million_output: config.cost_per_million_output,
                estimated_input_cost_raw: tokens_raw as f64 / 1_000_000.0 * config.cost_per_million_input,
                estimated_input_cost_cleaned: tokens_cleaned as f64 / 1_000_000.0 * config.cost_per_million_input,
                context_window: config.context_window,
                fits_in_context: tokens_cleaned <= config.context_window,
                is_exact,
            }
        })
        .collect()
}

/// `ceil(chars / chars_per_token)`; empty text is zero tokens.
fn heuristic_tokens(text: &str, chars_per_token: f64) -> u64 {
    if text.is_empty() {
        return 0;
    }
    (text.chars().count() as f64 / chars_per_token).ceil() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_rounds_up() {
        assert_eq!(heuristic_tokens("abcdefgh", 4.0), 2);
        assert_eq!(heuristic_tokens("abcdefghi", 4.0), 3);
        assert_eq!(heuristic_tokens("a", 4.0), 1);
    }

    #[test]
    fn test_empty_text_is_zero_tokens() {
        let catalog = ModelCatalog::default();
        let estimates = estimate_models("", "", &catalog, &TokenizerRegistry::new());

        for est in &estimates {
            assert_eq!(est.tokens_raw, 0);
            assert_eq!(est.tokens_cleaned, 0);
            assert_eq!(est.estimated_input_cost_raw, 0.0);
            assert!(est.fits_in_context);
        }
    }

    #[test]
    fn test_cost_reproducible_from_tokens_and_price() {
        let catalog = ModelCatalog::default();
        let raw = "x".repeat(10_000);
        let cleaned = "y".repeat(4_000);
        let estimates = estimate_models(&raw, &cleaned, &catalog, &TokenizerRegistry::new());

        for (est, config) in estimates.iter().zip(catalog.models()) {
            let expected_raw = (10_000f64 / config.chars_per_token).ceil() as u64;
            assert_eq!(est.tokens_raw, expected_raw);
            assert_eq!(
                est.estimated_input_cost_raw,
                est.tokens_raw as f64 / 1_000_000.0 * config.cost_per_million_input
            );
            assert!(!est.is_exact);
        }
    }

    #[test]
    fn test_output_matches_catalog_order() {
        let catalog = ModelCatalog::default();
        let estimates = estimate_models("text", "text", &catalog, &TokenizerRegistry::new());

        let names: Vec<&str> = estimates.iter().map(|e| e.model.as_str()).collect();
        let expected: Vec<&str> = catalog.models().iter().map(|m| m.model.as_str()).collect();
        assert_eq!(names, expected);
        assert_eq!(estimates.len(), 8);
    }

    #[test]
    fn test_context_fit() {
        let catalog = ModelCatalog::new(vec![ModelConfig::new("Tiny", "Test", 1.0, 1.0, 1.0, 10)]);
        let fits = estimate_models("", "1234567890", &catalog, &TokenizerRegistry::new());
        assert!(fits[0].fits_in_context);

        let overflows = estimate_models("", "12345678901", &catalog, &TokenizerRegistry::new());
        assert!(!overflows[0].fits_in_context);
    }

    #[test]
    fn test_exact_tokenizer_overrides_heuristic() {
        let catalog = ModelCatalog::default();
        let mut tokenizers = TokenizerRegistry::new();
        // Whitespace word count stands in for a real tokenizer.
        tokenizers.register("OpenAI", Arc::new(|text: &str| text.split_whitespace().count()));

        let estimates = estimate_models("one two three", "one two", &catalog, &tokenizers);

        for est in &estimates {
            if est.provider == "OpenAI" {
                assert!(est.is_exact);
                assert_eq!(est.tokens_raw, 3);
                assert_eq!(est.tokens_cleaned, 2);
            } else {
                assert!(!est.is_exact);
            }
        }
    }

    #[test]
    fn test_default_catalog_contents() {
        let catalog = ModelCatalog::default();
        assert_eq!(catalog.len(), 8);

        let sonnet = &catalog.models()[2];
        assert_eq!(sonnet.model, "Claude 3.5 Sonnet");
        assert_eq!(sonnet.provider, "Anthropic");
        assert_eq!(sonnet.context_window, 200_000);
    }
}
