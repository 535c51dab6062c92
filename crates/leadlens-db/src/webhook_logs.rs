//! Database operations for the append-only `webhook_logs` table.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `webhook_logs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WebhookLogRow {
    pub id: i64,
    pub event: String,
    pub target_url: String,
    pub payload: Json<serde_json::Value>,
    pub outcome: String,
    pub latency_ms: i64,
    pub error_detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Aggregates over webhook delivery attempts.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct WebhookStats {
    pub total: i64,
    pub success_count: i64,
    pub failed_count: i64,
    pub avg_latency_ms: Option<f64>,
}

/// Records one delivery attempt. Rows are never updated or deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_webhook_log(
    pool: &PgPool,
    event: &str,
    target_url: &str,
    payload: &serde_json::Value,
    outcome: &str,
    latency_ms: i64,
    error_detail: Option<&str>,
) -> Result<WebhookLogRow, DbError> {
    let row = sqlx::query_as::<_, WebhookLogRow>(
        "INSERT INTO webhook_logs (event, target_url, payload, outcome, latency_ms, error_detail) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, event, target_url, payload, outcome, latency_ms, error_detail, created_at",
    )
    .bind(event)
    .bind(target_url)
    .bind(Json(payload))
    .bind(outcome)
    .bind(latency_ms)
    .bind(error_detail)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns the most recent delivery attempts, optionally filtered by event
/// name and outcome.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_webhook_logs(
    pool: &PgPool,
    event: Option<&str>,
    outcome: Option<&str>,
    limit: i64,
) -> Result<Vec<WebhookLogRow>, DbError> {
    let rows = sqlx::query_as::<_, WebhookLogRow>(
        "SELECT id, event, target_url, payload, outcome, latency_ms, error_detail, created_at \
         FROM webhook_logs \
         WHERE ($1::text IS NULL OR event = $1) \
           AND ($2::text IS NULL OR outcome = $2) \
         ORDER BY created_at DESC \
         LIMIT $3",
    )
    .bind(event)
    .bind(outcome)
    .bind(limit.max(1))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Aggregate delivery stats: totals per outcome and average latency of
/// successful deliveries.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn webhook_stats(pool: &PgPool) -> Result<WebhookStats, DbError> {
    let stats = sqlx::query_as::<_, WebhookStats>(
        "SELECT COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE outcome = 'success') AS success_count, \
                COUNT(*) FILTER (WHERE outcome = 'failed') AS failed_count, \
                (AVG(latency_ms) FILTER (WHERE outcome = 'success'))::float8 AS avg_latency_ms \
         FROM webhook_logs",
    )
    .fetch_one(pool)
    .await?;

    Ok(stats)
}
