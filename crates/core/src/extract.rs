//! Clean-text extraction.
//!
//! This module turns a raw HTML document into the plain text an AI model
//! would actually read: non-content elements (scripts, styles, vector
//! graphics) are removed with a streaming rewriter, then the remaining text
//! is normalized. Two normalizations exist on purpose:
//!
//! - [`extract_clean_text`] preserves paragraph boundaries (blank lines) and
//!   feeds the readability analyzer and the token estimator.
//! - [`extract_flat_text`] collapses all whitespace to single spaces and is
//!   the stricter measure used for the byte breakdown.
//!
//! Both are deterministic and never fail; a document the rewriter cannot
//! process is passed through unchanged.

use regex::Regex;

use crate::parse::Document;

/// Extracts normalized plain text from an HTML document.
///
/// Removes `script`, `style`, `noscript`, and vector-graphics elements,
/// then collapses runs of spaces and tabs to one space, collapses two or
/// more blank lines to exactly one blank line, and trims the result.
/// Paragraph boundaries (single blank lines) survive, which the paragraph
/// counter depends on.
pub fn extract_clean_text(html: &str) -> String {
    let stripped = remove_noncontent_tags(html);
    let text = Document::parse(&stripped).text_content();

    let spaces = Regex::new(r"[ \t]+").unwrap();
    let blank_lines = Regex::new(r"\n\s*\n").unwrap();
    let newline_runs = Regex::new(r"\n{3,}").unwrap();

    let text = spaces.replace_all(&text, " ");
    let text = blank_lines.replace_all(&text, "\n\n");
    let text = newline_runs.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Extracts single-space-collapsed text from an HTML document.
///
/// Removes `script`, `style`, and `noscript` elements (vector graphics are
/// kept, matching the byte-accounting definition), then collapses all
/// whitespace to single spaces and trims. The length of this string is the
/// `text_bytes` figure in the content breakdown.
pub fn extract_flat_text(html: &str) -> String {
    let stripped = remove_code_tags(html);
    let text = Document::parse(&stripped).text_content();
    collapse_whitespace(&text)
}

/// Collapses every whitespace run to a single space and trims.
pub fn collapse_whitespace(text: &str) -> String {
    let whitespace = Regex::new(r"\s+").unwrap();
    whitespace.replace_all(text, " ").trim().to_string()
}

/// Remove script, style, noscript, svg, and path elements from HTML.
fn remove_noncontent_tags(html: &str) -> String {
    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![
                lol_html::element!("script", |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("style", |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("noscript", |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("svg", |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("path", |el| {
                    el.remove();
                    Ok(())
                }),
            ],
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    match rewriter.write(html.as_bytes()) {
        Ok(_) => {}
        Err(_) => return html.to_string(),
    }

    match rewriter.end() {
        Ok(_) => {}
        Err(_) => return html.to_string(),
    }

    output
}

/// Remove script, style, and noscript elements from HTML.
fn remove_code_tags(html: &str) -> String {
    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![
                lol_html::element!("script", |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("style", |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("noscript", |el| {
                    el.remove();
                    Ok(())
                }),
            ],
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    match rewriter.write(html.as_bytes()) {
        Ok(_) => {}
        Err(_) => return html.to_string(),
    }

    match rewriter.end() {
        Ok(_) => {}
        Err(_) => return html.to_string(),
    }

    output
}
