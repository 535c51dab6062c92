//! Database operations for the `leads` table.

use chrono::{DateTime, Utc};
use leadlens_core::{AiInsights, ContactSet, KeyPerson, LeadSnapshot, SocialPosts};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `leads` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub url: String,
    pub company_name: String,
    pub industry: String,
    pub company_size: String,
    pub location: String,
    pub summary: String,
    pub lead_score: f64,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub social_links: Vec<String>,
    pub tech_stack: Vec<String>,
    pub services: Vec<String>,
    pub pain_points: Vec<String>,
    pub key_people: Json<Vec<KeyPerson>>,
    pub ai_insights: Json<AiInsights>,
    pub social_posts: Json<SocialPosts>,
    pub scraped_title: String,
    pub scraped_description: String,
    pub analyzed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeadRow {
    /// Rebuilds the in-memory working state from the persisted columns.
    #[must_use]
    pub fn snapshot(&self) -> LeadSnapshot {
        LeadSnapshot {
            url: self.url.clone(),
            company_name: self.company_name.clone(),
            industry: self.industry.clone(),
            company_size: self.company_size.clone(),
            location: self.location.clone(),
            summary: self.summary.clone(),
            lead_score: self.lead_score,
            contacts: ContactSet {
                emails: self.emails.clone(),
                phones: self.phones.clone(),
                social_links: self.social_links.clone(),
            },
            key_people: self.key_people.0.clone(),
            tech_stack: self.tech_stack.clone(),
            services: self.services.clone(),
            pain_points: self.pain_points.clone(),
            ai_insights: self.ai_insights.0.clone(),
            social_posts: self.social_posts.0.clone(),
            scraped_title: self.scraped_title.clone(),
            scraped_description: self.scraped_description.clone(),
            analyzed_at: self.analyzed_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Filters and sorting
// ---------------------------------------------------------------------------

/// Sort orders for lead listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadSort {
    #[default]
    Newest,
    ScoreHigh,
    ScoreLow,
    Name,
}

impl LeadSort {
    /// Parses the query-string form; unrecognized values fall back to newest.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "score-high" => Self::ScoreHigh,
            "score-low" => Self::ScoreLow,
            "name" => Self::Name,
            _ => Self::Newest,
        }
    }

    fn order_clause(self) -> &'static str {
        match self {
            Self::Newest => "created_at DESC",
            Self::ScoreHigh => "lead_score DESC, created_at DESC",
            Self::ScoreLow => "lead_score ASC, created_at DESC",
            Self::Name => "company_name ASC",
        }
    }
}

/// Filter set for lead listings. `search` matches company name or URL,
/// case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub owner_id: Option<Uuid>,
    pub search: Option<String>,
    pub industry: Option<String>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub sort: LeadSort,
    pub page: i64,
    pub limit: i64,
}

/// Aggregates over the leads table.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct LeadStats {
    pub total: i64,
    pub avg_score: Option<f64>,
    pub high_score_count: i64,
}

const LEAD_COLUMNS: &str = "id, owner_id, url, company_name, industry, company_size, location, \
     summary, lead_score, emails, phones, social_links, tech_stack, services, pain_points, \
     key_people, ai_insights, social_posts, scraped_title, scraped_description, analyzed_at, \
     created_at, updated_at";

const LEAD_FILTER_CLAUSE: &str = "($1::uuid IS NULL OR owner_id = $1) \
     AND ($2::text IS NULL OR company_name ILIKE '%' || $2 || '%' OR url ILIKE '%' || $2 || '%') \
     AND ($3::text IS NULL OR industry ILIKE '%' || $3 || '%') \
     AND ($4::float8 IS NULL OR lead_score >= $4) \
     AND ($5::float8 IS NULL OR lead_score <= $5)";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a new lead from its working snapshot and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn insert_lead(
    pool: &PgPool,
    owner_id: Option<Uuid>,
    snapshot: &LeadSnapshot,
) -> Result<LeadRow, DbError> {
    let sql = format!(
        "INSERT INTO leads (owner_id, url, company_name, industry, company_size, location, \
                summary, lead_score, emails, phones, social_links, tech_stack, services, \
                pain_points, key_people, ai_insights, social_posts, scraped_title, \
                scraped_description, analyzed_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
                $18, $19, $20) \
         RETURNING {LEAD_COLUMNS}"
    );

    let row = sqlx::query_as::<_, LeadRow>(&sql)
        .bind(owner_id)
        .bind(&snapshot.url)
        .bind(&snapshot.company_name)
        .bind(&snapshot.industry)
        .bind(&snapshot.company_size)
        .bind(&snapshot.location)
        .bind(&snapshot.summary)
        .bind(snapshot.lead_score)
        .bind(&snapshot.contacts.emails)
        .bind(&snapshot.contacts.phones)
        .bind(&snapshot.contacts.social_links)
        .bind(&snapshot.tech_stack)
        .bind(&snapshot.services)
        .bind(&snapshot.pain_points)
        .bind(Json(&snapshot.key_people))
        .bind(Json(&snapshot.ai_insights))
        .bind(Json(&snapshot.social_posts))
        .bind(&snapshot.scraped_title)
        .bind(&snapshot.scraped_description)
        .bind(snapshot.analyzed_at)
        .fetch_one(pool)
        .await?;

    Ok(row)
}

/// Returns one lead by id, or `None` if absent or owned by someone else.
///
/// A `None` owner means no ownership filter (CLI and single-tenant use).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_lead(
    pool: &PgPool,
    id: Uuid,
    owner_id: Option<Uuid>,
) -> Result<Option<LeadRow>, DbError> {
    let sql = format!(
        "SELECT {LEAD_COLUMNS} FROM leads \
         WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)"
    );

    let row = sqlx::query_as::<_, LeadRow>(&sql)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Returns one page of leads matching the filter.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_leads(pool: &PgPool, filter: &LeadFilter) -> Result<Vec<LeadRow>, DbError> {
    let limit = filter.limit.max(1);
    let offset = (filter.page.max(1) - 1) * limit;
    let order = filter.sort.order_clause();

    let sql = format!(
        "SELECT {LEAD_COLUMNS} FROM leads \
         WHERE {LEAD_FILTER_CLAUSE} \
         ORDER BY {order} \
         LIMIT $6 OFFSET $7"
    );

    let rows = sqlx::query_as::<_, LeadRow>(&sql)
        .bind(filter.owner_id)
        .bind(&filter.search)
        .bind(&filter.industry)
        .bind(filter.min_score)
        .bind(filter.max_score)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Counts leads matching the filter, ignoring pagination.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_leads(pool: &PgPool, filter: &LeadFilter) -> Result<i64, DbError> {
    let sql = format!("SELECT COUNT(*) FROM leads WHERE {LEAD_FILTER_CLAUSE}");

    let count = sqlx::query_scalar::<_, i64>(&sql)
        .bind(filter.owner_id)
        .bind(&filter.search)
        .bind(&filter.industry)
        .bind(filter.min_score)
        .bind(filter.max_score)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Deletes one lead; returns `false` if nothing matched.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_lead(pool: &PgPool, id: Uuid, owner_id: Option<Uuid>) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM leads WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Writes the mutable snapshot columns back after a re-enrichment merge.
///
/// `url` and `analyzed_at` are intentionally not updatable.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the lead does not exist, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn update_lead(pool: &PgPool, id: Uuid, snapshot: &LeadSnapshot) -> Result<LeadRow, DbError> {
    let sql = format!(
        "UPDATE leads \
         SET company_name = $2, industry = $3, company_size = $4, location = $5, summary = $6, \
             lead_score = $7, emails = $8, phones = $9, social_links = $10, tech_stack = $11, \
             services = $12, pain_points = $13, key_people = $14, ai_insights = $15, \
             social_posts = $16, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {LEAD_COLUMNS}"
    );

    let row = sqlx::query_as::<_, LeadRow>(&sql)
        .bind(id)
        .bind(&snapshot.company_name)
        .bind(&snapshot.industry)
        .bind(&snapshot.company_size)
        .bind(&snapshot.location)
        .bind(&snapshot.summary)
        .bind(snapshot.lead_score)
        .bind(&snapshot.contacts.emails)
        .bind(&snapshot.contacts.phones)
        .bind(&snapshot.contacts.social_links)
        .bind(&snapshot.tech_stack)
        .bind(&snapshot.services)
        .bind(&snapshot.pain_points)
        .bind(Json(&snapshot.key_people))
        .bind(Json(&snapshot.ai_insights))
        .bind(Json(&snapshot.social_posts))
        .fetch_optional(pool)
        .await?;

    row.ok_or(DbError::NotFound)
}

/// Stores generated social posts on a lead.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the lead does not exist or is owned by
/// someone else, or [`DbError::Sqlx`] if the query fails.
pub async fn update_social_posts(
    pool: &PgPool,
    id: Uuid,
    owner_id: Option<Uuid>,
    posts: &SocialPosts,
) -> Result<LeadRow, DbError> {
    let sql = format!(
        "UPDATE leads SET social_posts = $3, updated_at = NOW() \
         WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2) \
         RETURNING {LEAD_COLUMNS}"
    );

    let row = sqlx::query_as::<_, LeadRow>(&sql)
        .bind(id)
        .bind(owner_id)
        .bind(Json(posts))
        .fetch_optional(pool)
        .await?;

    row.ok_or(DbError::NotFound)
}

/// Aggregate stats: total leads, average score, and count at or above 8.0.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn lead_stats(pool: &PgPool, owner_id: Option<Uuid>) -> Result<LeadStats, DbError> {
    let stats = sqlx::query_as::<_, LeadStats>(
        "SELECT COUNT(*) AS total, \
                AVG(lead_score) AS avg_score, \
                COUNT(*) FILTER (WHERE lead_score >= 8.0) AS high_score_count \
         FROM leads \
         WHERE ($1::uuid IS NULL OR owner_id = $1)",
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(stats)
}
