//! HTTP client for the `GET /search.json` enrichment endpoint.

use std::time::Duration;

use leadlens_core::EnrichmentResult;
use reqwest::Client;
use tracing::debug;

use crate::error::SearchError;
use crate::extract::enrichment_from_response;
use crate::types::SearchResponse;

/// Few results are needed; the knowledge graph and first page suffice.
const RESULT_COUNT: u32 = 5;

/// Client for the web-search enrichment API.
pub struct SearchClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl SearchClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("leadlens/0.1 (lead-intelligence)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.map(ToOwned::to_owned),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Searches for a company and condenses the results into an enrichment
    /// record. An empty result set is not an error; it yields a default
    /// record the merge engine treats as "nothing found".
    ///
    /// # Errors
    ///
    /// - [`SearchError::UnexpectedStatus`] — non-2xx HTTP status.
    /// - [`SearchError::Http`] — network failure or timeout.
    /// - [`SearchError::Deserialize`] — response body is not JSON.
    pub async fn search_company(&self, query: &str) -> Result<EnrichmentResult, SearchError> {
        let endpoint = format!("{}/search.json", self.base_url);

        let mut params = vec![
            ("engine", "google".to_owned()),
            ("q", query.to_owned()),
            ("num", RESULT_COUNT.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }

        let response = self.client.get(&endpoint).query(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
                context: format!("search response for \"{query}\""),
                source: e,
            })?;

        let enriched = enrichment_from_response(&parsed);
        debug!(
            query,
            website = %enriched.website,
            people = enriched.key_people.len(),
            "company search complete"
        );
        Ok(enriched)
    }
}
