//! Request middleware: request IDs, bearer auth, and rate limiting.
//!
//! Auth and rate-limit settings come from [`AppConfig`]; nothing here reads
//! the process environment. Rejections use the same response envelope as
//! the handlers, so clients see one error shape everywhere.

use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use leadlens_core::{AppConfig, Environment};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer-token auth derived from the application config.
///
/// An empty token set means auth is disabled; [`AuthState::from_config`]
/// refuses to build that state in production.
#[derive(Debug, Clone)]
pub struct AuthState {
    tokens: Arc<HashSet<String>>,
}

impl AuthState {
    /// # Errors
    ///
    /// Fails when no API keys are configured in the production environment.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let tokens: HashSet<String> = config.api_keys.iter().cloned().collect();

        if tokens.is_empty() {
            if config.env == Environment::Production {
                anyhow::bail!(
                    "LEADLENS_API_KEYS must provide at least one bearer token in production"
                );
            }
            tracing::warn!(env = %config.env, "no API keys configured, bearer auth disabled");
        }

        Ok(Self {
            tokens: Arc::new(tokens),
        })
    }

    fn enabled(&self) -> bool {
        !self.tokens.is_empty()
    }
}

struct Window {
    opened_at: Instant,
    admitted: u32,
}

/// Fixed-window request limiter shared across all routes.
#[derive(Clone)]
pub struct RateLimitState {
    max_requests: u32,
    window: Duration,
    current: Arc<Mutex<Window>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            current: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                admitted: 0,
            })),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.rate_limit_max_requests,
            Duration::from_secs(config.rate_limit_window_secs),
        )
    }

    /// Counts the request against the current window, rolling the window
    /// over when it has expired. Returns `false` when the limit is hit.
    async fn try_admit(&self) -> bool {
        let mut window = self.current.lock().await;

        if window.opened_at.elapsed() >= self.window {
            window.opened_at = Instant::now();
            window.admitted = 0;
        }

        if window.admitted >= self.max_requests {
            return false;
        }

        window.admitted += 1;
        true
    }
}

/// Attaches a request ID to every request and response.
///
/// An incoming `x-request-id` header is honored; otherwise a `UUIDv4` is
/// generated. The ID lands in request extensions as [`RequestId`] and on
/// the response as the same header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

/// Rejects requests without a configured bearer token, unless auth is
/// disabled.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled() {
        return next.run(req).await;
    }

    let authorized = bearer_token(&req).is_some_and(|token| auth.tokens.contains(token));
    if authorized {
        next.run(req).await
    } else {
        reject(&req, "unauthorized", "missing or invalid bearer token")
    }
}

/// Rejects requests once the shared window limit is exhausted.
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.try_admit().await {
        next.run(req).await
    } else {
        reject(&req, "rate_limited", "rate limit exceeded")
    }
}

fn reject(req: &Request, code: &str, message: &str) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map_or_else(String::new, |id| id.0.clone());
    ApiError::new(request_id, code, message).into_response()
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn config(env: Environment, api_keys: &[&str]) -> AppConfig {
        AppConfig {
            database_url: String::new(),
            env,
            bind_addr: "127.0.0.1:0".parse().expect("valid socket addr"),
            log_level: "info".to_string(),
            api_keys: api_keys.iter().map(ToString::to_string).collect(),
            rate_limit_max_requests: 120,
            rate_limit_window_secs: 60,
            db_max_connections: 5,
            db_min_connections: 1,
            db_acquire_timeout_secs: 10,
            scrape_api_key: None,
            scrape_base_url: "http://unused.invalid".to_string(),
            scrape_timeout_secs: 30,
            scrape_max_retries: 0,
            scrape_retry_backoff_secs: 0,
            analysis_api_key: None,
            analysis_base_url: "http://unused.invalid".to_string(),
            analysis_model: "test-model".to_string(),
            analysis_timeout_secs: 30,
            search_api_key: None,
            search_base_url: "http://unused.invalid".to_string(),
            search_timeout_secs: 10,
            webhook_timeout_secs: 5,
            webhook_lead_analyzed_url: None,
            webhook_high_score_url: None,
            webhook_social_post_url: None,
            webhook_signup_url: None,
        }
    }

    #[test]
    fn auth_enabled_when_keys_configured() {
        let auth = AuthState::from_config(&config(Environment::Development, &["k1", "k2"]))
            .expect("should build");
        assert!(auth.enabled());
        assert!(auth.tokens.contains("k1"));
    }

    #[test]
    fn auth_disabled_without_keys_outside_production() {
        let auth =
            AuthState::from_config(&config(Environment::Development, &[])).expect("should build");
        assert!(!auth.enabled());
    }

    #[test]
    fn auth_refuses_empty_keys_in_production() {
        assert!(AuthState::from_config(&config(Environment::Production, &[])).is_err());
    }

    #[test]
    fn bearer_token_parses_authorization_header() {
        let req = Request::builder()
            .header(AUTHORIZATION, "Bearer test-token")
            .body(Body::empty())
            .expect("request");
        assert_eq!(bearer_token(&req), Some("test-token"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes_and_blank_tokens() {
        for value in ["Basic abc123", "Bearer   "] {
            let req = Request::builder()
                .header(AUTHORIZATION, value)
                .body(Body::empty())
                .expect("request");
            assert_eq!(bearer_token(&req), None, "header {value:?}");
        }
    }

    #[tokio::test]
    async fn rate_limiter_admits_up_to_the_window_maximum() {
        let limiter = RateLimitState::new(2, Duration::from_secs(60));
        assert!(limiter.try_admit().await);
        assert!(limiter.try_admit().await);
        assert!(!limiter.try_admit().await);
    }
}
