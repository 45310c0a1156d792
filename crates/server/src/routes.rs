//! HTTP handlers.
//!
//! Thin glue over the core pipeline: validate the request, fetch and
//! analyze, record a history row (best effort), and map fetch failures to
//! meaningful status codes. No analysis logic lives here.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokenscope_core::{AnalysisResult, AnalysisSummary, Analyzer, TokenscopeError};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::storage::{AnalyzedPage, Storage};

/// Shared handler state: the history store and one reusable analyzer.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub analyzer: Arc<Analyzer>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_analyses: i64,
}

/// Error responses carry a `message` field, nothing else.
pub enum ApiError {
    InvalidRequest(String),
    Fetch(TokenscopeError),
    Db(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Fetch(err) => {
                let status = match &err {
                    TokenscopeError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                    TokenscopeError::HttpStatus { .. } | TokenscopeError::HttpError(_) => StatusCode::BAD_GATEWAY,
                    TokenscopeError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            ApiError::Db(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// `POST /api/analyze` - fetch a page and run the full analysis pipeline.
///
/// The history insert is fire-and-forget: a storage failure is logged and
/// the analysis is returned anyway.
pub async fn analyze(
    State(state): State<AppState>, Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let url = Url::parse(&req.url)
        .map_err(|_| ApiError::InvalidRequest("Please enter a valid URL".to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidRequest(
            "Only http and https URLs can be analyzed".to_string(),
        ));
    }

    let request_id = Uuid::new_v4();
    let fetched_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| ApiError::Db(e.to_string()))?;

    info!(%request_id, url = %req.url, "analyzing page");

    let result = state
        .analyzer
        .fetch_and_analyze(url.as_str(), &fetched_at)
        .await
        .map_err(ApiError::Fetch)?;

    let summary = AnalysisSummary::from(&result);
    if let Err(err) = state.storage.record_analysis(&summary).await {
        warn!(%request_id, %err, "failed to record analysis history");
    }

    info!(
        %request_id,
        structure_score = summary.structure_score,
        recommendations = result.recommendations.len(),
        "analysis complete"
    );

    Ok(Json(result))
}

/// `GET /api/history?limit=N` - recently analyzed pages, newest first.
pub async fn history(
    State(state): State<AppState>, Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<AnalyzedPage>>, ApiError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let rows = state.storage.recent(limit).await.map_err(|e| ApiError::Db(e.to_string()))?;
    Ok(Json(rows))
}

/// `GET /api/stats` - total number of stored analyses.
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let total = state.storage.total_count().await.map_err(|e| ApiError::Db(e.to_string()))?;
    Ok(Json(StatsResponse { total_analyses: total }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_request_deserializes() {
        let req: AnalyzeRequest = serde_json::from_str(r#"{"url":"https://example.com/"}"#).unwrap();
        assert_eq!(req.url, "https://example.com/");
    }

    #[test]
    fn test_history_limit_clamped() {
        for (given, expected) in [(None, 20), (Some(5), 5), (Some(0), 1), (Some(10_000), 100)] {
            let params = HistoryParams { limit: given };
            assert_eq!(params.limit.unwrap_or(20).clamp(1, 100), expected);
        }
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let url = Url::parse("ftp://example.com/file").unwrap();
        assert!(!matches!(url.scheme(), "http" | "https"));
    }
}
