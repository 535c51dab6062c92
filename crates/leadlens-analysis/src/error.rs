use thiserror::Error;

/// Errors returned by the analysis service client.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network or TLS failure from the underlying HTTP client, including
    /// timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from analysis service")]
    UnexpectedStatus { status: u16 },

    /// The response envelope could not be deserialized.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model returned text, but no parsable JSON object was found in it.
    #[error("no valid JSON block in model response for {context}")]
    MissingJsonBlock { context: String },

    /// The model returned no candidates at all.
    #[error("analysis service returned an empty response")]
    EmptyResponse,

    /// The configured base URL is unusable.
    #[error("invalid analysis base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
