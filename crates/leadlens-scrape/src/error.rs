use thiserror::Error;

/// Errors returned by the scrape service client.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network or TLS failure from the underlying HTTP client, including
    /// timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The service answered with a non-2xx status.
    #[error("unexpected HTTP status {status} while scraping {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The service reported that it could not extract the page.
    #[error("scrape of {url} failed: {detail}")]
    ScrapeFailed { url: String, detail: String },

    /// The configured base URL is unusable.
    #[error("invalid scrape base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
