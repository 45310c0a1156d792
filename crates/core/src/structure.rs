//! Structural and semantic analysis of an HTML document.
//!
//! Measures how much machine-legible structure a page carries: heading
//! hierarchy, semantic landmark elements, metadata presence, and DOM
//! nesting depth. The nesting walk uses an explicit stack with a hard cap
//! so pathological documents cannot exhaust the call stack.

use serde::Serialize;

use crate::parse::Document;

/// The fixed set of semantic landmark tags the analyzer looks for.
const SEMANTIC_TAGS: [&str; 13] = [
    "header",
    "footer",
    "nav",
    "main",
    "article",
    "section",
    "aside",
    "figure",
    "figcaption",
    "details",
    "summary",
    "mark",
    "time",
];

/// Upper bound on reported nesting depth; the walk stops descending here.
const MAX_NESTING_DEPTH: usize = 100;

/// Structural profile of one HTML document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureAnalysis {
    pub has_h1: bool,
    pub heading_count: usize,
    pub heading_hierarchy_valid: bool,
    /// Heading levels (1-6) in document order.
    pub heading_levels: Vec<u8>,
    pub has_meta_description: bool,
    pub has_meta_title: bool,
    pub has_open_graph: bool,
    pub semantic_element_count: usize,
    /// Which of the fixed semantic tags are present, in the set's order.
    pub semantic_elements: Vec<String>,
    pub nesting_depth: usize,
    pub table_count: usize,
    pub form_count: usize,
    pub iframe_count: usize,
}

impl StructureAnalysis {
    /// Weighted structure score in 0..=100.
    ///
    /// Used by the persistence layer and for UI labeling; independent of
    /// the recommendation rules. Weights: H1 and a valid hierarchy are
    /// worth 15 each, each metadata signal 10, any semantic markup 15,
    /// shallow nesting 10 (5 for moderate), no iframes 5, and up to 10 for
    /// heading count at 2 points per heading.
    pub fn structure_score(&self) -> u32 {
        let mut score = 0u32;

        if self.has_h1 {
            score += 15;
        }
        if self.heading_hierarchy_valid {
            score += 15;
        }
        if self.has_meta_title {
            score += 10;
        }
        if self.has_meta_description {
            score += 10;
        }
        if self.has_open_graph {
            score += 10;
        }
        if self.semantic_element_count > 0 {
            score += 15;
        }
        if self.nesting_depth <= 15 {
            score += 10;
        } else if self.nesting_depth <= 25 {
            score += 5;
        }
        if self.iframe_count == 0 {
            score += 5;
        }
        score += (2 * self.heading_count as u32).min(10);

        score.min(100)
    }
}

/// Analyzes the structural quality of a document.
///
/// Tolerates any input: a document without a body reports nesting depth 0,
/// an empty document reports all-zero counts.
pub fn analyze_structure(doc: &Document) -> StructureAnalysis {
    let heading_levels = collect_heading_levels(doc);
    let heading_hierarchy_valid = hierarchy_is_valid(&heading_levels);

    let mut semantic_elements = Vec::new();
    let mut semantic_element_count = 0;
    for tag in SEMANTIC_TAGS {
        let count = doc.select(tag).map(|els| els.len()).unwrap_or(0);
        if count > 0 {
            semantic_elements.push(tag.to_string());
            semantic_element_count += count;
        }
    }

    let has_meta_title = doc.title().is_some_and(|t| !t.trim().is_empty());

    StructureAnalysis {
        has_h1: !doc.select("h1").unwrap_or_default().is_empty(),
        heading_count: heading_levels.len(),
        heading_hierarchy_valid,
        heading_levels,
        has_meta_description: !doc.select(r#"meta[name="description"]"#).unwrap_or_default().is_empty(),
        has_meta_title,
        has_open_graph: !doc.select(r#"meta[property^="og:"]"#).unwrap_or_default().is_empty(),
        semantic_element_count,
        semantic_elements,
        nesting_depth: max_nesting_depth(doc),
        table_count: doc.select("table").unwrap_or_default().len(),
        form_count: doc.select("form").unwrap_or_default().len(),
        iframe_count: doc.select("iframe").unwrap_or_default().len(),
    }
}

/// Collect h1-h6 levels in document order.
fn collect_heading_levels(doc: &Document) -> Vec<u8> {
    doc.select("h1, h2, h3, h4, h5, h6")
        .unwrap_or_default()
        .iter()
        .filter_map(|el| el.tag_name().strip_prefix('h').and_then(|n| n.parse::<u8>().ok()))
        .collect()
}

/// A hierarchy is invalid iff any adjacent pair of levels increases by more
/// than one. Decreases of any size are always valid.
fn hierarchy_is_valid(levels: &[u8]) -> bool {
    levels.windows(2).all(|pair| pair[1] <= pair[0] + 1)
}

/// Maximum element-nesting depth below `<body>`, capped at
/// [`MAX_NESTING_DEPTH`].
///
/// Iterative depth-first walk with an explicit stack; only element nodes
/// count. A missing body yields depth 0.
fn max_nesting_depth(doc: &Document) -> usize {
    let Some(body) = doc.body() else {
        return 0;
    };

    let mut max_depth = 0;
    let mut stack: Vec<_> = body.children().into_iter().map(|el| (el, 1usize)).collect();

    while let Some((el, depth)) = stack.pop() {
        if depth > max_depth {
            max_depth = depth;
        }
        if depth >= MAX_NESTING_DEPTH {
            continue;
        }
        for child in el.children() {
            stack.push((child, depth + 1));
        }
    }

    max_depth.min(MAX_NESTING_DEPTH)
}
