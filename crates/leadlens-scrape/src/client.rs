//! HTTP client for the scrape service's `POST /scrape` endpoint.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use crate::error::ScrapeError;
use crate::retry::retry_with_backoff;
use crate::types::{ScrapeEnvelope, ScrapedPage};

/// Client for the content-extraction API.
///
/// Use [`ScrapeClient::new`] for production or point `base_url` at a mock
/// server in tests. The API key is optional so a misconfigured deployment
/// fails at the remote end with a normal HTTP error rather than at startup.
pub struct ScrapeClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ScrapeClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidBaseUrl`] if `base_url` does not parse
    /// as an absolute URL, or [`ScrapeError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScrapeError> {
        let base_url = base_url.trim_end_matches('/');
        reqwest::Url::parse(base_url).map_err(|e| ScrapeError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("leadlens/0.1 (lead-intelligence)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.map(ToOwned::to_owned),
            base_url: base_url.to_owned(),
            max_retries,
            backoff_base_ms: backoff_base_secs.saturating_mul(1_000),
        })
    }

    /// Scrapes one website and returns its main content, metadata, and links.
    ///
    /// Transient failures (network errors, 5xx) are retried with back-off;
    /// everything else fails closed.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::ScrapeFailed`] — the service reported it could not
    ///   extract the page.
    /// - [`ScrapeError::UnexpectedStatus`] — non-2xx HTTP status.
    /// - [`ScrapeError::Http`] — network failure or timeout after all
    ///   retries are exhausted.
    /// - [`ScrapeError::Deserialize`] — response body is not the expected
    ///   JSON envelope.
    pub async fn scrape(&self, url: &str) -> Result<ScrapedPage, ScrapeError> {
        let endpoint = format!("{}/scrape", self.base_url);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let endpoint = endpoint.clone();
            let url = url.to_owned();
            async move { self.scrape_once(&endpoint, &url).await }
        })
        .await
    }

    async fn scrape_once(&self, endpoint: &str, url: &str) -> Result<ScrapedPage, ScrapeError> {
        let mut request = self.client.post(endpoint).json(&json!({
            "url": url,
            "formats": ["markdown", "html"],
            "onlyMainContent": true,
        }));

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        let envelope: ScrapeEnvelope =
            serde_json::from_str(&body).map_err(|e| ScrapeError::Deserialize {
                context: format!("scrape response for {url}"),
                source: e,
            })?;

        if !envelope.success {
            return Err(ScrapeError::ScrapeFailed {
                url: url.to_owned(),
                detail: envelope
                    .error
                    .unwrap_or_else(|| "service reported failure without detail".to_owned()),
            });
        }

        let data = envelope.data.unwrap_or_default();
        Ok(ScrapedPage {
            url: url.to_owned(),
            title: data.metadata.title,
            description: data.metadata.description,
            content: data.markdown.or(data.html).unwrap_or_default(),
            links: data.links,
        })
    }
}
