//! Content fetching from URLs, files, and stdin.
//!
//! This module provides functions for retrieving HTML content from
//! various sources: HTTP/HTTPS URLs, local files, and standard input.
//! Fetching is the only operation in the crate that can block or fail on
//! I/O; everything downstream of the returned string is pure.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::{Result, TokenscopeError};

/// HTTP client configuration for fetching web pages.
///
/// This struct controls timeout and user agent settings for HTTP requests.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 15,
            user_agent: "Mozilla/5.0 (compatible; Tokenscope/1.0; +https://github.com/stormlightlabs/tokenscope)"
                .to_string(),
        }
    }
}

/// Fetches HTML content from a URL.
///
/// This function performs an HTTP GET request and returns the response body
/// as text. It follows redirects, respects the configured timeout, and uses
/// a browser-like User-Agent for better compatibility.
///
/// # Errors
///
/// Returns [`TokenscopeError::Timeout`] when the request exceeds the
/// configured timeout, [`TokenscopeError::HttpStatus`] for non-2xx
/// responses, and [`TokenscopeError::HttpError`] for transport failures.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| TokenscopeError::InvalidUrl(e.to_string()))?;

    if parsed_url.scheme().is_empty() {
        return Err(TokenscopeError::InvalidUrl(
            "URL must include a scheme (http:// or https://)".to_string(),
        ));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(TokenscopeError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                TokenscopeError::Timeout { timeout: config.timeout }
            } else {
                TokenscopeError::HttpError(e)
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TokenscopeError::HttpStatus { status: status.as_u16() });
    }

    let content = response.text().await.map_err(|e| {
        if e.is_timeout() {
            TokenscopeError::Timeout { timeout: config.timeout }
        } else {
            TokenscopeError::HttpError(e)
        }
    })?;

    Ok(content)
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(TokenscopeError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(TokenscopeError::from)
    }
}

/// Reads HTML content from standard input.
///
/// This function reads all available input from stdin until EOF.
/// Useful for piping content from other commands.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(TokenscopeError::from)?;

    Ok(buffer)
}
