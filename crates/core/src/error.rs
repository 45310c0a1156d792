//! Error types for Tokenscope operations.
//!
//! This module defines the main error type [`TokenscopeError`] which
//! represents all possible errors that can occur while obtaining the HTML
//! input for an analysis. The analysis pipeline itself is total over string
//! inputs and never produces an error of its own: degenerate documents
//! (empty HTML, missing body, zero sentences) fall back to zero/default
//! values in each analyzer.
//!
//! # Example
//!
//! ```rust
//! use tokenscope_core::{TokenscopeError, Result};
//!
//! fn read_page(html: &str) -> Result<&str> {
//!     if html.is_empty() {
//!         return Err(TokenscopeError::HtmlParseError("empty input".to_string()));
//!     }
//!     Ok(html)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for analysis input operations.
///
/// This enum represents all possible errors that can occur during HTTP
/// fetching, file I/O, and document parsing. Fetch failures are fatal to the
/// request that triggered them and are never retried here; retry policy, if
/// any, belongs to the caller.
#[derive(Error, Debug)]
pub enum TokenscopeError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Non-success HTTP status.
    ///
    /// Returned when the target URL responds with anything outside the 2xx
    /// range. The response body is discarded; an error page is not
    /// analyzable content.
    #[error("Failed to fetch URL: HTTP {status}")]
    HttpStatus { status: u16 },

    /// Invalid URL provided.
    ///
    /// Returned when a URL cannot be parsed or is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors.
    ///
    /// Returned when a CSS selector is invalid or a document facade
    /// operation fails. Malformed HTML itself never produces this: the
    /// parser recovers best-effort like a browser would.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// File not found.
    ///
    /// Returned when attempting to read a file that doesn't exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    ///
    /// Wraps standard I/O errors for file operations.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),
}

/// Result type alias for TokenscopeError.
///
/// This is a convenience alias for `std::result::Result<T, TokenscopeError>`.
pub type Result<T> = std::result::Result<T, TokenscopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TokenscopeError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_http_status_error() {
        let err = TokenscopeError::HttpStatus { status: 404 };
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_timeout_error() {
        let err = TokenscopeError::Timeout { timeout: 15 };
        assert!(err.to_string().contains("15"));
    }

    #[test]
    fn test_file_not_found_error() {
        let err = TokenscopeError::FileNotFound(PathBuf::from("/missing.html"));
        assert!(err.to_string().contains("missing.html"));
    }
}
