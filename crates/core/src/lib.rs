pub mod analyzer;
pub mod breakdown;
pub mod error;
pub mod estimate;
pub mod extract;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod parse;
pub mod readability;
pub mod recommend;
pub mod structure;
pub mod summary;

pub use analyzer::{AnalysisResult, Analyzer, analyze};
pub use breakdown::{ContentBreakdown, analyze_content};
pub use error::{Result, TokenscopeError};
pub use estimate::{
    ModelCatalog, ModelConfig, ModelTokenEstimate, TokenCounter, TokenizerRegistry, estimate_models,
};
pub use extract::{collapse_whitespace, extract_clean_text, extract_flat_text};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, fetch_file, fetch_stdin, fetch_url};
pub use parse::Document;
pub use readability::{ReadabilityMetrics, analyze_readability, count_syllables};
pub use recommend::{Category, Impact, Recommendation, RuleContext, generate_recommendations};
pub use structure::{StructureAnalysis, analyze_structure};
pub use summary::{AnalysisSummary, ModelCostSummary};
