//! Analysis pipeline entry point.
//!
//! [`Analyzer`] sequences the individual analyzers over one HTML document
//! and assembles the final [`AnalysisResult`]. The pipeline is synchronous
//! and pure: given the same HTML, URL, timestamp, and catalog it produces a
//! byte-identical result, so independent analyses can run fully in
//! parallel with no coordination.
//!
//! # Example
//!
//! ```rust
//! use tokenscope_core::analyze;
//!
//! let html = "<html><head><title>Hi</title></head><body><h1>Hi</h1><p>Word word.</p></body></html>";
//! let result = analyze(html, "https://example.com/", "2024-01-15T10:30:00Z");
//! assert!(result.structure_analysis.has_h1);
//! assert_eq!(result.readability.word_count, 2);
//! ```

use serde::Serialize;

use crate::breakdown::{ContentBreakdown, analyze_content};
use crate::estimate::{ModelCatalog, ModelTokenEstimate, TokenCounter, TokenizerRegistry, estimate_models};
use crate::extract::extract_clean_text;
use crate::parse::Document;
use crate::readability::{ReadabilityMetrics, analyze_readability};
use crate::recommend::{Recommendation, RuleContext, generate_recommendations};
use crate::structure::{StructureAnalysis, analyze_structure};

#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, fetch_url};
#[cfg(feature = "fetch")]
use crate::Result;

/// Cleaned-text preview length carried in the result, in characters.
const PREVIEW_CHARS: usize = 500;

/// The complete result of analyzing one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub url: String,
    /// Caller-supplied fetch timestamp; the pipeline never reads a clock.
    pub fetched_at: String,
    pub raw_html_length: usize,
    pub cleaned_text_length: usize,
    /// Preview of the cleaned text, truncated to 500 characters.
    pub cleaned_text: String,
    pub page_title: String,
    /// One entry per configured model, in catalog order.
    pub model_estimates: Vec<ModelTokenEstimate>,
    pub content_breakdown: ContentBreakdown,
    pub structure_analysis: StructureAnalysis,
    pub readability: ReadabilityMetrics,
    /// Sorted by impact: high, then medium, then low.
    pub recommendations: Vec<Recommendation>,
    pub markup_to_content_ratio: f64,
}

/// Pipeline orchestrator: a model catalog, optional exact tokenizers, and
/// the fetch settings, bundled so one configuration can serve many pages.
///
/// # Example
///
/// ```rust
/// use tokenscope_core::Analyzer;
///
/// let analyzer = Analyzer::new();
/// let result = analyzer.analyze("<p>Hello there.</p>", "https://example.com/", "2024-01-15T10:30:00Z");
/// assert_eq!(result.model_estimates.len(), 8);
/// ```
#[derive(Debug, Default)]
pub struct Analyzer {
    catalog: ModelCatalog,
    tokenizers: TokenizerRegistry,
    #[cfg(feature = "fetch")]
    fetch_config: FetchConfig,
}

impl Analyzer {
    /// Creates an analyzer with the stock model catalog and no exact
    /// tokenizers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an analyzer over an explicit model catalog.
    pub fn with_catalog(catalog: ModelCatalog) -> Self {
        Self { catalog, ..Self::default() }
    }

    /// Registers an exact tokenizer for a provider family; every model of
    /// that provider then reports `is_exact` counts.
    pub fn register_tokenizer(&mut self, provider: &str, counter: std::sync::Arc<dyn TokenCounter>) {
        self.tokenizers.register(provider, counter);
    }

    /// Overrides the fetch settings used by [`Analyzer::fetch_and_analyze`].
    #[cfg(feature = "fetch")]
    pub fn with_fetch_config(mut self, fetch_config: FetchConfig) -> Self {
        self.fetch_config = fetch_config;
        self
    }

    /// Runs the full analysis pipeline over one HTML document.
    ///
    /// Total over all inputs: empty or malformed HTML produces a result
    /// with zeroed counts, never an error. `fetched_at` is recorded
    /// verbatim so re-running on identical inputs reproduces the result
    /// byte for byte.
    pub fn analyze(&self, html: &str, url: &str, fetched_at: &str) -> AnalysisResult {
        let doc = Document::parse(html);
        let cleaned_text = extract_clean_text(html);
        let page_title = doc.title().map(|t| t.trim().to_string()).unwrap_or_default();

        let model_estimates = estimate_models(html, &cleaned_text, &self.catalog, &self.tokenizers);
        let content_breakdown = analyze_content(html, &doc, url);
        let structure_analysis = analyze_structure(&doc);
        let readability = analyze_readability(&cleaned_text);

        let markup_to_content_ratio = if content_breakdown.text_bytes > 0 {
            content_breakdown.total_html_bytes as f64 / content_breakdown.text_bytes as f64
        } else {
            0.0
        };

        let recommendations = generate_recommendations(&RuleContext {
            breakdown: &content_breakdown,
            structure: &structure_analysis,
            readability: &readability,
            markup_to_content_ratio,
        });

        AnalysisResult {
            url: url.to_string(),
            fetched_at: fetched_at.to_string(),
            raw_html_length: html.len(),
            cleaned_text_length: cleaned_text.len(),
            cleaned_text: cleaned_text.chars().take(PREVIEW_CHARS).collect(),
            page_title,
            model_estimates,
            content_breakdown,
            structure_analysis,
            readability,
            recommendations,
            markup_to_content_ratio,
        }
    }

    /// Fetches a URL and analyzes the response body.
    ///
    /// `fetched_at` is still caller-supplied: the analyzer owns no clock,
    /// so callers stamp the moment they initiated the fetch.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_analyze(&self, url: &str, fetched_at: &str) -> Result<AnalysisResult> {
        let html = fetch_url(url, &self.fetch_config).await?;
        Ok(self.analyze(&html, url, fetched_at))
    }
}

impl AnalysisResult {
    /// Gets the result as structured JSON.
    ///
    /// Returns a `serde_json::Value` with the complete analysis, suitable
    /// for API responses or storage.
    pub fn to_json(&self) -> crate::Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| crate::TokenscopeError::HtmlParseError(e.to_string()))
    }
}

/// Analyzes one document with the stock configuration.
///
/// Convenience wrapper over [`Analyzer::analyze`] for one-off calls.
pub fn analyze(html: &str, url: &str, fetched_at: &str) -> AnalysisResult {
    Analyzer::new().analyze(html, url, fetched_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_PAGE: &str =
        "<html><head><title>Hi</title></head><body><h1>Hi</h1><p>Word word.</p></body></html>";

    #[test]
    fn test_simple_page() {
        let result = analyze(SIMPLE_PAGE, "https://example.com/", "2024-01-15T10:30:00Z");

        assert!(result.structure_analysis.has_h1);
        assert_eq!(result.structure_analysis.heading_count, 1);
        assert!(result.structure_analysis.heading_hierarchy_valid);
        assert!(result.structure_analysis.has_meta_title);
        assert_eq!(result.readability.word_count, 2);
        assert_eq!(result.readability.sentence_count, 1);
        assert_eq!(result.page_title, "Hi");
        assert_eq!(result.url, "https://example.com/");
        assert_eq!(result.fetched_at, "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_empty_html_is_total() {
        let result = analyze("", "https://example.com/", "2024-01-15T10:30:00Z");

        assert_eq!(result.raw_html_length, 0);
        assert_eq!(result.cleaned_text_length, 0);
        assert_eq!(result.markup_to_content_ratio, 0.0);
        assert_eq!(result.content_breakdown.total_html_bytes, 0);
        for est in &result.model_estimates {
            assert_eq!(est.tokens_raw, 0);
        }
    }

    #[test]
    fn test_preview_truncation() {
        let body = "word ".repeat(300);
        let html = format!("<body><p>{}</p></body>", body);
        let result = analyze(&html, "https://example.com/", "2024-01-15T10:30:00Z");

        assert_eq!(result.cleaned_text.chars().count(), 500);
        assert!(result.cleaned_text_length > 500);
    }

    #[test]
    fn test_markup_ratio() {
        let result = analyze(SIMPLE_PAGE, "https://example.com/", "2024-01-15T10:30:00Z");
        let expected = result.content_breakdown.total_html_bytes as f64
            / result.content_breakdown.text_bytes as f64;
        assert_eq!(result.markup_to_content_ratio, expected);
    }

    #[test]
    fn test_estimates_follow_catalog_order() {
        let result = analyze(SIMPLE_PAGE, "https://example.com/", "2024-01-15T10:30:00Z");
        let expected: Vec<String> = ModelCatalog::default()
            .models()
            .iter()
            .map(|m| m.model.clone())
            .collect();
        let actual: Vec<String> = result.model_estimates.iter().map(|e| e.model.clone()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_to_json() {
        let result = analyze(SIMPLE_PAGE, "https://example.com/", "2024-01-15T10:30:00Z");
        let json = result.to_json().unwrap();

        assert!(json.is_object());
        assert!(json.get("model_estimates").is_some());
        assert!(json.get("recommendations").is_some());
    }

    #[test]
    fn test_title_whitespace_trimmed() {
        let html = "<html><head><title>  Spaced Out  </title></head><body></body></html>";
        let result = analyze(html, "https://example.com/", "2024-01-15T10:30:00Z");
        assert_eq!(result.page_title, "Spaced Out");
    }
}
