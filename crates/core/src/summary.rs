//! Summarized analysis projection for persistence.
//!
//! Storage keeps a compact row per analyzed page rather than the full
//! result; this module is that projection. The core has no dependency on
//! storage succeeding; it only shapes the record.

use serde::Serialize;

use crate::analyzer::AnalysisResult;

/// Per-model cost digest kept in history rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelCostSummary {
    pub model: String,
    pub provider: String,
    pub tokens_cleaned: u64,
    pub estimated_input_cost_cleaned: f64,
}

/// The record handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub url: String,
    pub page_title: String,
    pub fetched_at: String,
    pub raw_html_length: usize,
    pub cleaned_text_length: usize,
    pub structure_score: u32,
    pub readability_score: f64,
    pub readability_grade: String,
    pub markup_to_content_ratio: f64,
    pub model_costs: Vec<ModelCostSummary>,
}

impl From<&AnalysisResult> for AnalysisSummary {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            url: result.url.clone(),
            page_title: result.page_title.clone(),
            fetched_at: result.fetched_at.clone(),
            raw_html_length: result.raw_html_length,
            cleaned_text_length: result.cleaned_text_length,
            structure_score: result.structure_analysis.structure_score(),
            readability_score: result.readability.readability_score,
            readability_grade: result.readability.readability_grade.clone(),
            markup_to_content_ratio: result.markup_to_content_ratio,
            model_costs: result
                .model_estimates
                .iter()
                .map(|est| ModelCostSummary {
                    model: est.model.clone(),
                    provider: est.provider.clone(),
                    tokens_cleaned: est.tokens_cleaned,
                    estimated_input_cost_cleaned: est.estimated_input_cost_cleaned,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze;

    #[test]
    fn test_summary_projection() {
        let html = "<html><head><title>Hi</title></head><body><h1>Hi</h1><p>Word word.</p></body></html>";
        let result = analyze(html, "https://example.com/", "2024-01-15T10:30:00Z");
        let summary = AnalysisSummary::from(&result);

        assert_eq!(summary.url, result.url);
        assert_eq!(summary.page_title, "Hi");
        assert_eq!(summary.structure_score, result.structure_analysis.structure_score());
        assert_eq!(summary.model_costs.len(), result.model_estimates.len());
        assert_eq!(summary.model_costs[0].model, result.model_estimates[0].model);
    }

    #[test]
    fn test_summary_serializes() {
        let result = analyze("<p>hi.</p>", "https://example.com/", "2024-01-15T10:30:00Z");
        let summary = AnalysisSummary::from(&result);
        let json = serde_json::to_value(&summary).unwrap();

        assert!(json.get("structure_score").is_some());
        assert!(json.get("model_costs").unwrap().is_array());
    }
}
