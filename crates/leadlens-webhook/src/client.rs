//! The dispatcher: one POST per event, one log row per attempt.

use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::events::WebhookEvent;

/// Leads scoring below this never trigger the high-score event.
pub const HIGH_SCORE_THRESHOLD: f64 = 8.0;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Result of a single dispatch. Short-circuit variants mean no HTTP request
/// was made and no log row was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Success { latency_ms: i64 },
    Failed { latency_ms: i64, error: String },
    NotConfigured,
    ScoreTooLow,
}

/// Fire-and-forget webhook sender.
pub struct WebhookClient {
    client: Client,
}

impl WebhookClient {
    /// Creates a sender with the given per-request timeout (0 means the
    /// 5-second default).
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the underlying client cannot be
    /// constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let timeout = if timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_secs
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("leadlens/0.1 (lead-intelligence)")
            .build()?;

        Ok(Self { client })
    }

    /// Delivers one event to `target_url` and records the attempt.
    ///
    /// An unset or empty target returns [`DeliveryOutcome::NotConfigured`]
    /// without a request or a log row. Delivery and logging failures are
    /// reported in the outcome, never as an error.
    pub async fn dispatch(
        &self,
        pool: &PgPool,
        event: WebhookEvent,
        target_url: Option<&str>,
        data: &Value,
    ) -> DeliveryOutcome {
        let Some(url) = target_url.filter(|u| !u.is_empty()) else {
            warn!(%event, "webhook target not configured, skipping");
            return DeliveryOutcome::NotConfigured;
        };

        let payload = json!({
            "event": event.as_str(),
            "timestamp": Utc::now().to_rfc3339(),
            "data": data,
        });

        let start = Instant::now();
        let result = self.client.post(url).json(&payload).send().await;
        let latency_ms = i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX);

        let error = match result {
            Ok(response) if response.status().is_success() => None,
            Ok(response) => Some(format!("unexpected HTTP status {}", response.status().as_u16())),
            Err(e) => Some(e.to_string()),
        };

        match error {
            None => {
                self.log(pool, event, url, &payload, "success", latency_ms, None)
                    .await;
                info!(%event, latency_ms, "webhook delivered");
                DeliveryOutcome::Success { latency_ms }
            }
            Some(error) => {
                // Failed attempts keep a reduced payload: event and data
                // only, no timestamp envelope.
                let reduced = json!({ "event": event.as_str(), "data": data });
                self.log(pool, event, url, &reduced, "failed", latency_ms, Some(&error))
                    .await;
                warn!(%event, latency_ms, error, "webhook delivery failed");
                DeliveryOutcome::Failed { latency_ms, error }
            }
        }
    }

    /// Delivers the high-score event, gated on the lead's score.
    ///
    /// Scores below [`HIGH_SCORE_THRESHOLD`] return
    /// [`DeliveryOutcome::ScoreTooLow`]: no request, no log row.
    pub async fn dispatch_high_score(
        &self,
        pool: &PgPool,
        target_url: Option<&str>,
        lead_score: f64,
        data: &Value,
    ) -> DeliveryOutcome {
        if lead_score < HIGH_SCORE_THRESHOLD {
            return DeliveryOutcome::ScoreTooLow;
        }
        self.dispatch(pool, WebhookEvent::HighScoreLead, target_url, data)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn log(
        &self,
        pool: &PgPool,
        event: WebhookEvent,
        url: &str,
        payload: &Value,
        outcome: &str,
        latency_ms: i64,
        error_detail: Option<&str>,
    ) {
        if let Err(e) = leadlens_db::insert_webhook_log(
            pool,
            event.as_str(),
            url,
            payload,
            outcome,
            latency_ms,
            error_detail,
        )
        .await
        {
            warn!(%event, error = %e, "failed to record webhook delivery log");
        }
    }
}
