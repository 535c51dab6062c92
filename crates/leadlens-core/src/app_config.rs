use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration for every adapter and service.
///
/// Built once at startup and injected into the pipeline so it can be
/// exercised with fake adapters (wiremock base URLs) in tests; nothing in
/// the pipeline reads the environment directly.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Accepted bearer tokens. Empty disables auth outside production.
    pub api_keys: Vec<String>,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scrape_api_key: Option<String>,
    pub scrape_base_url: String,
    pub scrape_timeout_secs: u64,
    pub scrape_max_retries: u32,
    pub scrape_retry_backoff_secs: u64,
    pub analysis_api_key: Option<String>,
    pub analysis_base_url: String,
    pub analysis_model: String,
    pub analysis_timeout_secs: u64,
    pub search_api_key: Option<String>,
    pub search_base_url: String,
    pub search_timeout_secs: u64,
    pub webhook_timeout_secs: u64,
    pub webhook_lead_analyzed_url: Option<String>,
    pub webhook_high_score_url: Option<String>,
    pub webhook_social_post_url: Option<String>,
    pub webhook_signup_url: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("api_keys", &format_args!("[{} redacted]", self.api_keys.len()))
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scrape_api_key",
                &self.scrape_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("scrape_base_url", &self.scrape_base_url)
            .field("scrape_timeout_secs", &self.scrape_timeout_secs)
            .field("scrape_max_retries", &self.scrape_max_retries)
            .field("scrape_retry_backoff_secs", &self.scrape_retry_backoff_secs)
            .field(
                "analysis_api_key",
                &self.analysis_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("analysis_base_url", &self.analysis_base_url)
            .field("analysis_model", &self.analysis_model)
            .field("analysis_timeout_secs", &self.analysis_timeout_secs)
            .field(
                "search_api_key",
                &self.search_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("search_base_url", &self.search_base_url)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("webhook_timeout_secs", &self.webhook_timeout_secs)
            .field("webhook_lead_analyzed_url", &self.webhook_lead_analyzed_url)
            .field("webhook_high_score_url", &self.webhook_high_score_url)
            .field("webhook_social_post_url", &self.webhook_social_post_url)
            .field("webhook_signup_url", &self.webhook_signup_url)
            .finish()
    }
}
