//! Webhook delivery log endpoints.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use leadlens_db::WebhookLogRow;
use serde::{Deserialize, Serialize};

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct LogsQuery {
    event: Option<String>,
    outcome: Option<String>,
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
struct WebhookLogItem {
    id: i64,
    event: String,
    target_url: String,
    payload: serde_json::Value,
    outcome: String,
    latency_ms: i64,
    error_detail: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<WebhookLogRow> for WebhookLogItem {
    fn from(row: WebhookLogRow) -> Self {
        Self {
            id: row.id,
            event: row.event,
            target_url: row.target_url,
            payload: row.payload.0,
            outcome: row.outcome,
            latency_ms: row.latency_ms,
            error_detail: row.error_detail,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct WebhookStatsData {
    total: i64,
    success_count: i64,
    failed_count: i64,
    success_rate: f64,
    avg_latency_ms: f64,
}

pub(super) async fn list_logs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LogsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = leadlens_db::list_webhook_logs(
        &state.pool,
        query.event.as_deref(),
        query.outcome.as_deref(),
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(WebhookLogItem::from).collect::<Vec<_>>(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn webhook_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = leadlens_db::webhook_stats(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let success_rate = if stats.total > 0 {
        #[allow(clippy::cast_precision_loss)]
        let rate = stats.success_count as f64 / stats.total as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    } else {
        0.0
    };

    Ok(Json(ApiResponse {
        data: WebhookStatsData {
            total: stats.total,
            success_count: stats.success_count,
            failed_count: stats.failed_count,
            success_rate,
            avg_latency_ms: stats
                .avg_latency_ms
                .map_or(0.0, |avg| (avg * 10.0).round() / 10.0),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
