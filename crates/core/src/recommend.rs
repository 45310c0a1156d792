//! Rule-based improvement recommendations.
//!
//! The rules live in an ordered table of independent predicates over the
//! analyzer outputs; any subset may fire, and an empty result means the
//! page is already well-optimized. Final ordering is a separate, explicit
//! stable sort by impact so rule evaluation order never leaks into output
//! order.

use serde::Serialize;

use crate::breakdown::ContentBreakdown;
use crate::readability::ReadabilityMetrics;
use crate::structure::StructureAnalysis;

/// What part of the page a recommendation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Content,
    Structure,
    Performance,
    Accessibility,
}

/// How much a recommendation is expected to matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    /// Sort rank: high before medium before low.
    fn rank(self) -> u8 {
        match self {
            Impact::High => 0,
            Impact::Medium => 1,
            Impact::Low => 2,
        }
    }
}

/// One actionable finding about a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub impact: Impact,
    pub title: String,
    pub description: String,
}

/// Everything the rules are allowed to look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub breakdown: &'a ContentBreakdown,
    pub structure: &'a StructureAnalysis,
    pub readability: &'a ReadabilityMetrics,
    pub markup_to_content_ratio: f64,
}

type Rule = fn(&RuleContext<'_>) -> Option<Recommendation>;

/// The rule table, evaluated top to bottom. Order here is documentation
/// order only; the output is re-sorted by impact.
const RULES: &[Rule] = &[
    rule_script_heavy,
    rule_style_heavy,
    rule_markup_ratio,
    rule_missing_h1,
    rule_heading_hierarchy,
    rule_no_semantic_elements,
    rule_images_without_alt,
    rule_deep_nesting,
    rule_iframes,
    rule_missing_meta_description,
    rule_long_sentences,
    rule_many_tables,
];

/// Evaluates every rule and returns the findings sorted by impact.
pub fn generate_recommendations(ctx: &RuleContext<'_>) -> Vec<Recommendation> {
    let mut recs: Vec<Recommendation> = RULES.iter().filter_map(|rule| rule(ctx)).collect();
    recs.sort_by_key(|rec| rec.impact.rank());
    recs
}

fn rule_script_heavy(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    (ctx.breakdown.script_bytes > ctx.breakdown.text_bytes).then(|| Recommendation {
        category: Category::Performance,
        impact: Impact::High,
        title: "Strip scripts before AI processing".to_string(),
        description: "This page has more JavaScript than text content. Remove all <script> tags before \
                      sending to an AI model to significantly reduce token usage and cost."
            .to_string(),
    })
}

fn rule_style_heavy(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    (ctx.breakdown.style_bytes as f64 > ctx.breakdown.text_bytes as f64 * 0.5).then(|| Recommendation {
        category: Category::Performance,
        impact: Impact::High,
        title: "Remove CSS before AI processing".to_string(),
        description: "Significant CSS content detected. Strip all <style> tags and inline styles to \
                      reduce tokens without losing meaningful content."
            .to_string(),
    })
}

/// The two ratio thresholds are mutually exclusive; only the higher fires.
fn rule_markup_ratio(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if ctx.markup_to_content_ratio > 5.0 {
        Some(Recommendation {
            category: Category::Performance,
            impact: Impact::High,
            title: "Very high markup-to-content ratio".to_string(),
            description: "The HTML markup is over 5x the actual text content. Extract plain text only \
                          to dramatically reduce token usage."
                .to_string(),
        })
    } else if ctx.markup_to_content_ratio > 3.0 {
        Some(Recommendation {
            category: Category::Performance,
            impact: Impact::Medium,
            title: "High markup-to-content ratio".to_string(),
            description: "Consider extracting text content and converting to a simpler format like \
                          Markdown before sending to AI."
                .to_string(),
        })
    } else {
        None
    }
}

fn rule_missing_h1(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    (!ctx.structure.has_h1).then(|| Recommendation {
        category: Category::Structure,
        impact: Impact::Medium,
        title: "Missing H1 heading".to_string(),
        description: "No H1 heading found. Adding a clear main heading helps AI models understand the \
                      page's primary topic."
            .to_string(),
    })
}

fn rule_heading_hierarchy(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    (!ctx.structure.heading_hierarchy_valid).then(|| Recommendation {
        category: Category::Structure,
        impact: Impact::Medium,
        title: "Fix heading hierarchy".to_string(),
        description: "Heading levels skip levels (e.g., H1 to H3). A logical heading hierarchy helps AI \
                      models understand content structure and importance."
            .to_string(),
    })
}

fn rule_no_semantic_elements(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    (ctx.structure.semantic_element_count == 0).then(|| Recommendation {
        category: Category::Structure,
        impact: Impact::Medium,
        title: "Add semantic HTML elements".to_string(),
        description: "No semantic elements found (nav, main, article, section, etc.). Semantic HTML \
                      helps AI distinguish navigation from main content."
            .to_string(),
    })
}

fn rule_images_without_alt(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    (ctx.breakdown.images_without_alt > 0).then(|| Recommendation {
        category: Category::Accessibility,
        impact: Impact::Medium,
        title: format!("Add alt text to {} image(s)", ctx.breakdown.images_without_alt),
        description: "Images without alt text are invisible to AI text models. Adding descriptive alt \
                      text ensures the AI understands all visual content."
            .to_string(),
    })
}

fn rule_deep_nesting(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    (ctx.structure.nesting_depth > 20).then(|| Recommendation {
        category: Category::Structure,
        impact: Impact::Low,
        title: "Reduce DOM nesting depth".to_string(),
        description: format!(
            "The page has {} levels of nesting. Deeply nested HTML increases token usage without \
             adding meaning. Flatten the structure where possible.",
            ctx.structure.nesting_depth
        ),
    })
}

fn rule_iframes(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    (ctx.structure.iframe_count > 0).then(|| Recommendation {
        category: Category::Content,
        impact: Impact::Medium,
        title: format!("{} iframe(s) detected", ctx.structure.iframe_count),
        description: "Content inside iframes is not accessible when parsing the page HTML. Consider \
                      inlining the iframe content if it's important for AI analysis."
            .to_string(),
    })
}

fn rule_missing_meta_description(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    (!ctx.structure.has_meta_description).then(|| Recommendation {
        category: Category::Structure,
        impact: Impact::Low,
        title: "Add meta description".to_string(),
        description: "A meta description provides a concise summary that helps AI quickly understand \
                      the page purpose without processing all content."
            .to_string(),
    })
}

fn rule_long_sentences(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    (ctx.readability.avg_sentence_length > 25.0).then(|| Recommendation {
        category: Category::Content,
        impact: Impact::Low,
        title: "Simplify sentence structure".to_string(),
        description: format!(
            "Average sentence length is {:.0} words. Shorter sentences (15-20 words) are easier for AI \
             models to parse accurately.",
            ctx.readability.avg_sentence_length
        ),
    })
}

fn rule_many_tables(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    (ctx.structure.table_count > 3).then(|| Recommendation {
        category: Category::Content,
        impact: Impact::Low,
        title: "Convert tables to structured data".to_string(),
        description: "Multiple tables detected. Converting table data to JSON or a structured format \
                      can improve AI comprehension and reduce tokens."
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readability::analyze_readability;

    fn clean_breakdown() -> ContentBreakdown {
        ContentBreakdown {
            total_html_bytes: 2_000,
            text_bytes: 1_000,
            script_bytes: 0,
            style_bytes: 0,
            markup_bytes: 1_000,
            image_count: 0,
            images_with_alt: 0,
            images_without_alt: 0,
            link_count: 0,
            internal_links: 0,
            external_links: 0,
        }
    }

    fn clean_structure() -> StructureAnalysis {
        StructureAnalysis {
            has_h1: true,
            heading_count: 3,
            heading_hierarchy_valid: true,
            heading_levels: vec![1, 2, 2],
            has_meta_description: true,
            has_meta_title: true,
            has_open_graph: true,
            semantic_element_count: 4,
            semantic_elements: vec!["main".to_string(), "article".to_string()],
            nesting_depth: 8,
            table_count: 0,
            form_count: 0,
            iframe_count: 0,
        }
    }

    fn clean_readability() -> ReadabilityMetrics {
        analyze_readability("Short words here. More short words here.")
    }

    #[test]
    fn test_well_optimized_page_yields_nothing() {
        let breakdown = clean_breakdown();
        let structure = clean_structure();
        let readability = clean_readability();
        let ctx = RuleContext {
            breakdown: &breakdown,
            structure: &structure,
            readability: &readability,
            markup_to_content_ratio: 2.0,
        };

        assert!(generate_recommendations(&ctx).is_empty());
    }

    #[test]
    fn test_script_heavy_fires_high() {
        let mut breakdown = clean_breakdown();
        breakdown.script_bytes = 1_001;
        let structure = clean_structure();
        let readability = clean_readability();
        let ctx = RuleContext {
            breakdown: &breakdown,
            structure: &structure,
            readability: &readability,
            markup_to_content_ratio: 2.0,
        };

        let recs = generate_recommendations(&ctx);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].impact, Impact::High);
        assert_eq!(recs[0].category, Category::Performance);
        assert!(recs[0].title.contains("Strip scripts"));
    }

    #[test]
    fn test_ratio_thresholds_mutually_exclusive() {
        let breakdown = clean_breakdown();
        let structure = clean_structure();
        let readability = clean_readability();

        let high = RuleContext {
            breakdown: &breakdown,
            structure: &structure,
            readability: &readability,
            markup_to_content_ratio: 6.0,
        };
        let recs = generate_recommendations(&high);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].impact, Impact::High);

        let medium = RuleContext { markup_to_content_ratio: 4.0, ..high };
        let recs = generate_recommendations(&medium);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].impact, Impact::Medium);

        let neither = RuleContext { markup_to_content_ratio: 3.0, ..high };
        assert!(generate_recommendations(&neither).is_empty());
    }

    #[test]
    fn test_alt_text_message_includes_count() {
        let mut breakdown = clean_breakdown();
        breakdown.image_count = 1;
        breakdown.images_without_alt = 1;
        let structure = clean_structure();
        let readability = clean_readability();
        let ctx = RuleContext {
            breakdown: &breakdown,
            structure: &structure,
            readability: &readability,
            markup_to_content_ratio: 2.0,
        };

        let recs = generate_recommendations(&ctx);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].category, Category::Accessibility);
        assert!(recs[0].title.contains("1 image(s)"));
    }

    #[test]
    fn test_impact_ordering_is_stable_and_ranked() {
        // Fire one low (meta description), one medium (H1), one high
        // (scripts) and check the output order regardless of rule order.
        let mut breakdown = clean_breakdown();
        breakdown.script_bytes = 2_000;
        let mut structure = clean_structure();
        structure.has_h1 = false;
        structure.has_meta_description = false;
        let readability = clean_readability();
        let ctx = RuleContext {
            breakdown: &breakdown,
            structure: &structure,
            readability: &readability,
            markup_to_content_ratio: 2.0,
        };

        let recs = generate_recommendations(&ctx);
        let impacts: Vec<Impact> = recs.iter().map(|r| r.impact).collect();
        assert_eq!(impacts, vec![Impact::High, Impact::Medium, Impact::Low]);
    }

    #[test]
    fn test_long_sentence_message_rounds() {
        let breakdown = clean_breakdown();
        let structure = clean_structure();
        let words = "word ".repeat(30);
        let readability = analyze_readability(&format!("{}.", words.trim()));
        assert!(readability.avg_sentence_length > 25.0);

        let ctx = RuleContext {
            breakdown: &breakdown,
            structure: &structure,
            readability: &readability,
            markup_to_content_ratio: 2.0,
        };
        let recs = generate_recommendations(&ctx);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].description.contains("30 words"));
    }

    #[test]
    fn test_deep_nesting_and_tables_fire_low() {
        let breakdown = clean_breakdown();
        let mut structure = clean_structure();
        structure.nesting_depth = 30;
        structure.table_count = 5;
        let readability = clean_readability();
        let ctx = RuleContext {
            breakdown: &breakdown,
            structure: &structure,
            readability: &readability,
            markup_to_content_ratio: 2.0,
        };

        let recs = generate_recommendations(&ctx);
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.impact == Impact::Low));
        assert!(recs.iter().any(|r| r.description.contains("30 levels")));
    }
}
