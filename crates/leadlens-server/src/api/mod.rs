mod leads;
mod webhooks;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use leadlens_pipeline::{Pipeline, PipelineError};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub pipeline: Arc<Pipeline>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "unprocessable" => StatusCode::UNPROCESSABLE_ENTITY,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "configuration_missing" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

pub(super) fn map_db_error(request_id: String, error: &leadlens_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn map_pipeline_error(request_id: String, error: &PipelineError) -> ApiError {
    match error {
        PipelineError::Scrape { url, source } => {
            tracing::warn!(url, error = %source, "scrape failed");
            ApiError::new(
                request_id,
                "bad_request",
                format!("could not scrape {url}"),
            )
        }
        PipelineError::NotFound => ApiError::new(request_id, "not_found", "lead not found"),
        PipelineError::UnsupportedPlatform { platform } => ApiError::new(
            request_id,
            "validation_error",
            format!("unsupported social platform \"{platform}\""),
        ),
        PipelineError::ConfigurationMissing(component) => ApiError::new(
            request_id,
            "configuration_missing",
            format!("{component} is not configured"),
        ),
        other => {
            tracing::error!(error = %other, "pipeline failed");
            ApiError::new(request_id, "internal_error", "pipeline failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/leads/analyze", post(leads::analyze_lead))
        .route("/api/v1/leads", get(leads::list_leads))
        .route("/api/v1/leads/stats", get(leads::lead_stats))
        .route(
            "/api/v1/leads/{id}",
            get(leads::get_lead).delete(leads::delete_lead),
        )
        .route("/api/v1/leads/{id}/enrich", post(leads::enrich_lead))
        .route(
            "/api/v1/leads/{id}/social-post",
            post(leads::store_social_post),
        )
        .route("/api/v1/webhooks/logs", get(webhooks::list_logs))
        .route("/api/v1/webhooks/stats", get(webhooks::webhook_stats))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match leadlens_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::Utc;
    use leadlens_core::{AppConfig, ContactSet, Environment, LeadSnapshot};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(scrape_url: &str) -> AppConfig {
        AppConfig {
            database_url: String::new(),
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("valid socket addr"),
            log_level: "info".to_string(),
            api_keys: Vec::new(),
            rate_limit_max_requests: 120,
            rate_limit_window_secs: 60,
            db_max_connections: 5,
            db_min_connections: 1,
            db_acquire_timeout_secs: 10,
            scrape_api_key: None,
            scrape_base_url: scrape_url.to_string(),
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

    fn test_app(pool: sqlx::PgPool, scrape_url: &str) -> Router {
        let config = test_config(scrape_url);
        let auth = AuthState::from_config(&config).expect("auth state");
        let rate_limit = RateLimitState::from_config(&config);
        let pipeline = Arc::new(Pipeline::from_config(&config).expect("pipeline should build"));
        build_app(AppState { pool, pipeline }, auth, rate_limit)
    }

    fn make_snapshot(url: &str, company_name: &str, score: f64) -> LeadSnapshot {
        LeadSnapshot {
            url: url.to_string(),
            company_name: company_name.to_string(),
            industry: "SaaS".to_string(),
            company_size: "10-50 employees".to_string(),
            location: "Austin, TX".to_string(),
            summary: "Builds widgets.".to_string(),
            lead_score: score,
            contacts: ContactSet::default(),
            key_people: Vec::new(),
            tech_stack: Vec::new(),
            services: Vec::new(),
            pain_points: Vec::new(),
            ai_insights: leadlens_core::AiInsights::default(),
            social_posts: leadlens_core::SocialPosts::default(),
            scraped_title: String::new(),
            scraped_description: String::new(),
            analyzed_at: Utc::now(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 50);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 200);
        assert_eq!(normalize_limit(Some(25)), 25);
    }

    #[test]
    fn api_error_unprocessable_maps_to_422() {
        let response = ApiError::new("req-1", "unprocessable", "invalid url").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn api_error_not_found_maps_to_404() {
        let response = ApiError::new("req-1", "not_found", "lead not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_returns_ok(pool: sqlx::PgPool) {
        let app = test_app(pool, "http://unused.invalid");
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"].as_str(), Some("ok"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn configured_keys_require_bearer_token(pool: sqlx::PgPool) {
        let mut config = test_config("http://unused.invalid");
        config.api_keys = vec!["secret-token".to_string()];
        let auth = AuthState::from_config(&config).expect("auth state");
        let rate_limit = RateLimitState::from_config(&config);
        let pipeline = Arc::new(Pipeline::from_config(&config).expect("pipeline should build"));
        let app = build_app(AppState { pool, pipeline }, auth, rate_limit);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/leads")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"].as_str(), Some("unauthorized"));
        assert!(json["meta"]["request_id"].is_string());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/leads")
                    .header("authorization", "Bearer secret-token")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn analyze_rejects_invalid_url(pool: sqlx::PgPool) {
        let app = test_app(pool, "http://unused.invalid");
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/leads/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"url": "not a url"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"].as_str(), Some("unprocessable"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn analyze_maps_scrape_failure_to_400(pool: sqlx::PgPool) {
        let scrape = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "error": "This website is not supported"
            })))
            .mount(&scrape)
            .await;

        let app = test_app(pool, &scrape.uri());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/leads/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"url": "https://blocked.example"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"].as_str(), Some("bad_request"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn list_leads_returns_seeded_rows(pool: sqlx::PgPool) {
        leadlens_db::insert_lead(&pool, None, &make_snapshot("https://acme.example", "Acme", 9.0))
            .await
            .expect("insert failed");
        leadlens_db::insert_lead(&pool, None, &make_snapshot("https://beta.example", "Beta", 6.0))
            .await
            .expect("insert failed");

        let app = test_app(pool, "http://unused.invalid");
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/leads?sort=score-high&limit=10")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["total"].as_i64(), Some(2));
        let items = json["data"]["items"].as_array().expect("items array");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["company_name"].as_str(), Some("Acme"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn lead_stats_rounds_average(pool: sqlx::PgPool) {
        leadlens_db::insert_lead(&pool, None, &make_snapshot("https://a.example", "A", 9.0))
            .await
            .expect("insert failed");
        leadlens_db::insert_lead(&pool, None, &make_snapshot("https://b.example", "B", 6.0))
            .await
            .expect("insert failed");

        let app = test_app(pool, "http://unused.invalid");
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/leads/stats")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["total"].as_i64(), Some(2));
        assert!((json["data"]["avg_score"].as_f64().unwrap() - 7.5).abs() < f64::EPSILON);
        assert_eq!(json["data"]["high_score_count"].as_i64(), Some(1));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_lead_returns_404_for_unknown_id(pool: sqlx::PgPool) {
        let app = test_app(pool, "http://unused.invalid");
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/leads/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn delete_lead_removes_row(pool: sqlx::PgPool) {
        let inserted = leadlens_db::insert_lead(
            &pool,
            None,
            &make_snapshot("https://acme.example", "Acme", 7.0),
        )
        .await
        .expect("insert failed");

        let app = test_app(pool.clone(), "http://unused.invalid");
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/leads/{}", inserted.id))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let remaining = leadlens_db::count_leads(&pool, &leadlens_db::LeadFilter::default())
            .await
            .expect("count failed");
        assert_eq!(remaining, 0);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn social_post_stores_message_on_lead(pool: sqlx::PgPool) {
        let inserted = leadlens_db::insert_lead(
            &pool,
            None,
            &make_snapshot("https://acme.example", "Acme", 7.0),
        )
        .await
        .expect("insert failed");

        let app = test_app(pool, "http://unused.invalid");
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/leads/{}/social-post", inserted.id))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"platform": "twitter", "message": "Check out Acme!"}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json["data"]["social_posts"]["twitter"].as_str(),
            Some("Check out Acme!")
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn social_post_rejects_unknown_platform(pool: sqlx::PgPool) {
        let app = test_app(pool, "http://unused.invalid");
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/leads/{}/social-post", uuid::Uuid::new_v4()))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"platform": "myspace", "message": "hi"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"].as_str(), Some("validation_error"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn enrich_without_search_config_returns_503(pool: sqlx::PgPool) {
        let app = test_app(pool, "http://unused.invalid");
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/leads/{}/enrich", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(
            json["error"]["code"].as_str(),
            Some("configuration_missing")
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn webhook_logs_and_stats_routes_return_ok(pool: sqlx::PgPool) {
        let payload = serde_json::json!({ "event": "lead_analyzed" });
        leadlens_db::insert_webhook_log(
            &pool,
            "lead_analyzed",
            "https://hooks.example/a",
            &payload,
            "success",
            80,
            None,
        )
        .await
        .expect("insert log failed");

        let app = test_app(pool, "http://unused.invalid");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/webhooks/logs?event=lead_analyzed")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let items = json["data"].as_array().expect("data array");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["outcome"].as_str(), Some("success"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/webhooks/stats")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["total"].as_i64(), Some(1));
        assert!((json["data"]["success_rate"].as_f64().unwrap() - 100.0).abs() < f64::EPSILON);
    }
}
