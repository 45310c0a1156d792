//! Postgres persistence for analysis history.
//!
//! One row per analyzed page: the summary projection plus an insertion
//! timestamp. The analyze endpoint treats every storage failure as
//! non-fatal; the analysis result is returned to the client regardless.

use std::fmt;

use deadpool_postgres::{Pool, PoolError};
use serde::Serialize;
use time::OffsetDateTime;
use tokenscope_core::AnalysisSummary;

/// A stored history row.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedPage {
    pub id: i32,
    pub url: String,
    pub page_title: String,
    pub structure_score: i32,
    pub readability_score: f64,
    pub markup_to_content_ratio: f64,
    /// Per-model cost digest, as stored (JSONB).
    pub model_costs: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub analyzed_at: OffsetDateTime,
}

#[derive(Debug)]
pub enum StorageError {
    Pool(PoolError),
    Db(tokio_postgres::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Pool(err) => write!(f, "connection pool error: {}", err),
            StorageError::Db(err) => write!(f, "database error: {}", err),
            StorageError::Serialize(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<PoolError> for StorageError {
    fn from(err: PoolError) -> Self {
        StorageError::Pool(err)
    }
}

impl From<tokio_postgres::Error> for StorageError {
    fn from(err: tokio_postgres::Error) -> Self {
        StorageError::Db(err)
    }
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS analyzed_pages (
    id SERIAL PRIMARY KEY,
    url TEXT NOT NULL,
    page_title TEXT NOT NULL DEFAULT '',
    structure_score INTEGER NOT NULL,
    readability_score DOUBLE PRECISION NOT NULL,
    markup_to_content_ratio DOUBLE PRECISION NOT NULL,
    model_costs JSONB NOT NULL,
    analyzed_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

/// History store backed by a Postgres pool.
pub struct Storage {
    pool: Pool,
}

impl Storage {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Creates the history table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        let client = self.pool.get().await?;
        client.batch_execute(SCHEMA).await?;
        Ok(())
    }

    /// Records one analysis summary; returns the new row id.
    pub async fn record_analysis(&self, summary: &AnalysisSummary) -> Result<i32, StorageError> {
        let client = self.pool.get().await?;
        let model_costs = serde_json::to_value(&summary.model_costs).map_err(StorageError::Serialize)?;

        let row = client
            .query_one(
                "INSERT INTO analyzed_pages
                    (url, page_title, structure_score, readability_score, markup_to_content_ratio, model_costs)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING id",
                &[
                    &summary.url,
                    &summary.page_title,
                    &(summary.structure_score as i32),
                    &summary.readability_score,
                    &summary.markup_to_content_ratio,
                    &model_costs,
                ],
            )
            .await?;

        Ok(row.get(0))
    }

    /// The most recently analyzed pages, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<AnalyzedPage>, StorageError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT id, url, page_title, structure_score, readability_score,
                        markup_to_content_ratio, model_costs, analyzed_at
                 FROM analyzed_pages
                 ORDER BY analyzed_at DESC, id DESC
                 LIMIT $1",
                &[&limit],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| AnalyzedPage {
                id: row.get("id"),
                url: row.get("url"),
                page_title: row.get("page_title"),
                structure_score: row.get("structure_score"),
                readability_score: row.get("readability_score"),
                markup_to_content_ratio: row.get("markup_to_content_ratio"),
                model_costs: row.get("model_costs"),
                analyzed_at: row.get("analyzed_at"),
            })
            .collect())
    }

    /// Total number of stored analyses.
    pub async fn total_count(&self) -> Result<i64, StorageError> {
        let client = self.pool.get().await?;
        let row = client.query_one("SELECT COUNT(*) FROM analyzed_pages", &[]).await?;
        Ok(row.get(0))
    }
}
