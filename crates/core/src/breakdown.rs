//! Byte accounting for an HTML payload.
//!
//! Answers "where do the bytes of this page go" from a model-consumption
//! point of view: prose text, embedded scripts, embedded styles, and the
//! markup scaffolding around them, plus image alt-text and link locality
//! counts. Always produces a result, even for empty or malformed HTML.

use serde::Serialize;
use url::Url;

use crate::extract::extract_flat_text;
use crate::parse::Document;

/// Byte and element accounting for one HTML document.
///
/// All fields are non-negative; `markup_bytes` is derived as
/// `max(0, total - text - script - style)`, `images_with_alt +
/// images_without_alt == image_count`, and `internal_links +
/// external_links == link_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBreakdown {
    pub total_html_bytes: usize,
    pub text_bytes: usize,
    pub script_bytes: usize,
    pub style_bytes: usize,
    pub markup_bytes: usize,
    pub image_count: usize,
    pub images_with_alt: usize,
    pub images_without_alt: usize,
    pub link_count: usize,
    pub internal_links: usize,
    pub external_links: usize,
}

/// Analyzes where the bytes of a page go.
///
/// `url` is the page's own address and is used only for link locality: a
/// link is external iff its href starts with an HTTP scheme and does not
/// contain the source hostname as a substring. This is a coarse heuristic,
/// not a security boundary: `notexample.com` is classified internal for a
/// page on `example.com`, and an unparseable source URL degrades to
/// classifying every link as internal.
pub fn analyze_content(html: &str, doc: &Document, url: &str) -> ContentBreakdown {
    let mut script_bytes = 0;
    let mut style_bytes = 0;

    for el in doc.select("script").unwrap_or_default() {
        script_bytes += el.inner_html().len();
    }
    for el in doc.select("style").unwrap_or_default() {
        style_bytes += el.inner_html().len();
    }

    let text_bytes = extract_flat_text(html).len();
    let markup_bytes = html
        .len()
        .saturating_sub(text_bytes)
        .saturating_sub(script_bytes)
        .saturating_sub(style_bytes);

    let images = doc.select("img").unwrap_or_default();
    let mut images_with_alt = 0;
    let mut images_without_alt = 0;
    for img in &images {
        match img.attr("alt") {
            Some(alt) if !alt.trim().is_empty() => images_with_alt += 1,
            _ => images_without_alt += 1,
        }
    }

    let links = doc.select("a[href]").unwrap_or_default();
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();

    let mut internal_links = 0;
    let mut external_links = 0;
    for link in &links {
        let href = link.attr("href").unwrap_or("");
        if href.starts_with("http") && !href.contains(&host) {
            external_links += 1;
        } else {
            internal_links += 1;
        }
    }

    ContentBreakdown {
        total_html_bytes: html.len(),
        text_bytes,
        script_bytes,
        style_bytes,
        markup_bytes,
        image_count: images.len(),
        images_with_alt,
        images_without_alt,
        link_count: links.len(),
        internal_links,
        external_links,
    }
}
