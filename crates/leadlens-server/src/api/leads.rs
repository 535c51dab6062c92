//! Lead endpoints: analyze, list, fetch, enrich, social posts, stats.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use leadlens_core::{AiInsights, KeyPerson, SocialPosts};
use leadlens_db::{LeadFilter, LeadRow, LeadSort};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    map_db_error, map_pipeline_error, normalize_limit, ApiError, ApiResponse, AppState,
    ResponseMeta,
};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct LeadItem {
    id: Uuid,
    owner_id: Option<Uuid>,
    url: String,
    company_name: String,
    industry: String,
    company_size: String,
    location: String,
    summary: String,
    lead_score: f64,
    emails: Vec<String>,
    phones: Vec<String>,
    social_links: Vec<String>,
    tech_stack: Vec<String>,
    services: Vec<String>,
    pain_points: Vec<String>,
    key_people: Vec<KeyPerson>,
    ai_insights: AiInsights,
    social_posts: SocialPosts,
    scraped_title: String,
    scraped_description: String,
    analyzed_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LeadRow> for LeadItem {
    fn from(row: LeadRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            url: row.url,
            company_name: row.company_name,
            industry: row.industry,
            company_size: row.company_size,
            location: row.location,
            summary: row.summary,
            lead_score: row.lead_score,
            emails: row.emails,
            phones: row.phones,
            social_links: row.social_links,
            tech_stack: row.tech_stack,
            services: row.services,
            pain_points: row.pain_points,
            key_people: row.key_people.0,
            ai_insights: row.ai_insights.0,
            social_posts: row.social_posts.0,
            scraped_title: row.scraped_title,
            scraped_description: row.scraped_description,
            analyzed_at: row.analyzed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    url: String,
    owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListLeadsQuery {
    search: Option<String>,
    industry: Option<String>,
    min_score: Option<f64>,
    max_score: Option<f64>,
    sort: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
    owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OwnerQuery {
    owner_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
struct PaginatedLeads {
    items: Vec<LeadItem>,
    total: i64,
    page: i64,
    limit: i64,
}

#[derive(Debug, Serialize)]
struct LeadStatsData {
    total: i64,
    avg_score: f64,
    high_score_count: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct SocialPostRequest {
    platform: String,
    message: String,
    owner_id: Option<Uuid>,
}

fn validate_url(request_id: &str, url: &str) -> Result<(), ApiError> {
    let parsed = reqwest::Url::parse(url).map_err(|_| {
        ApiError::new(request_id, "unprocessable", "url is not a valid absolute URL")
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::new(
            request_id,
            "unprocessable",
            "url must use the http or https scheme",
        ));
    }
    Ok(())
}

pub(super) async fn analyze_lead(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_url(&req_id.0, &body.url)?;

    let lead = state
        .pipeline
        .analyze(&state.pool, body.owner_id, &body.url)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: LeadItem::from(lead),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn list_leads(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListLeadsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = normalize_limit(query.limit);
    let page = query.page.unwrap_or(1).max(1);
    let filter = LeadFilter {
        owner_id: query.owner_id,
        search: query.search,
        industry: query.industry,
        min_score: query.min_score,
        max_score: query.max_score,
        sort: query.sort.as_deref().map(LeadSort::parse).unwrap_or_default(),
        page,
        limit,
    };

    let rows = leadlens_db::list_leads(&state.pool, &filter)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let total = leadlens_db::count_leads(&state.pool, &filter)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: PaginatedLeads {
            items: rows.into_iter().map(LeadItem::from).collect(),
            total,
            page,
            limit,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn lead_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<OwnerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = leadlens_db::lead_stats(&state.pool, query.owner_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: LeadStatsData {
            total: stats.total,
            avg_score: stats.avg_score.map_or(0.0, |avg| (avg * 10.0).round() / 10.0),
            high_score_count: stats.high_score_count,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_lead(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Query(query): Query<OwnerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let row = leadlens_db::get_lead(&state.pool, id, query.owner_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "lead not found"))?;

    Ok(Json(ApiResponse {
        data: LeadItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn delete_lead(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Query(query): Query<OwnerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = leadlens_db::delete_lead(&state.pool, id, query.owner_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(req_id.0, "not_found", "lead not found"));
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn enrich_lead(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Query(query): Query<OwnerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let lead = state
        .pipeline
        .enrich(&state.pool, query.owner_id, id)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: LeadItem::from(lead),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn store_social_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(body): Json<SocialPostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.message.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "message must not be empty",
        ));
    }

    let lead = state
        .pipeline
        .store_social_post(&state.pool, body.owner_id, id, &body.platform, &body.message)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: LeadItem::from(lead),
        meta: ResponseMeta::new(req_id.0),
    }))
}
