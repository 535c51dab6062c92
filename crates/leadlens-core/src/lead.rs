//! Domain types shared across the lead pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel the analysis adapter emits for fields it could not determine.
///
/// The merge engine treats a `location` equal to this value as empty, so
/// enrichment data may fill it.
pub const UNKNOWN_SENTINEL: &str = "Unknown";

/// Structured company profile produced by the analysis adapter.
///
/// Field names serialize in camelCase because that is the JSON shape the
/// generative model is prompted to emit; the analysis client deserializes
/// the model's JSON block directly into this type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyAnalysis {
    pub company_name: String,
    pub industry: String,
    pub company_size: String,
    pub location: String,
    pub summary: String,
    pub services: Vec<String>,
    pub pain_points: Vec<String>,
    pub tech_stack: Vec<String>,
    pub key_features: Vec<String>,
    pub target_audience: String,
    pub value_proposition: String,
}

impl CompanyAnalysis {
    /// Fixed fallback record used when the analysis adapter fails.
    ///
    /// The company name falls back to the scraped page title, or the literal
    /// `"Unknown"` when no title was scraped. The summary is left empty
    /// rather than set to a placeholder so no fabricated prose reaches the
    /// end user.
    #[must_use]
    pub fn fallback(page_title: &str) -> Self {
        let title = page_title.trim();
        Self {
            company_name: if title.is_empty() {
                UNKNOWN_SENTINEL.to_string()
            } else {
                title.to_string()
            },
            industry: UNKNOWN_SENTINEL.to_string(),
            company_size: UNKNOWN_SENTINEL.to_string(),
            location: UNKNOWN_SENTINEL.to_string(),
            summary: String::new(),
            target_audience: UNKNOWN_SENTINEL.to_string(),
            value_proposition: UNKNOWN_SENTINEL.to_string(),
            ..Self::default()
        }
    }
}

/// Contact details extracted from scraped page content.
///
/// Each list behaves as a set: no duplicate entries, first occurrence order
/// preserved. Social links are kept exactly as scraped (case-sensitive).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactSet {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub social_links: Vec<String>,
}

/// A named person associated with a company (founder, CEO, executive).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyPerson {
    pub name: String,
    pub role: String,
    pub link: String,
}

/// Variable-shaped analyzer output modeled as typed optional fields.
///
/// `rating`/`reviews` come from search enrichment and always overwrite
/// earlier values; the remaining fields come from analysis only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiInsights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_proposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<i64>,
}

/// Generated outreach drafts for a lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialPosts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Data returned by the search enrichment adapter for one query.
///
/// All fields are best-effort; empty strings and empty lists mean the
/// search surfaced nothing for that field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnrichmentResult {
    pub website: String,
    pub location: String,
    pub snippet: String,
    pub rating: Option<f64>,
    pub reviews: i64,
    pub social_links: Vec<String>,
    pub key_people: Vec<KeyPerson>,
}

/// The in-memory working state of a lead during pipeline execution.
///
/// Built by the merge engine, persisted once, and mutated afterwards only by
/// a re-enrichment merge that follows the same precedence rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSnapshot {
    /// Never overwritten after initial assignment, even if enrichment
    /// reports a different canonical website.
    pub url: String,
    pub company_name: String,
    pub industry: String,
    pub company_size: String,
    pub location: String,
    pub summary: String,
    /// Bounded to `[1, 10]` with one decimal place.
    pub lead_score: f64,
    pub contacts: ContactSet,
    /// Unique by exact `name`; first-seen wins, insertion order preserved.
    pub key_people: Vec<KeyPerson>,
    pub tech_stack: Vec<String>,
    pub services: Vec<String>,
    pub pain_points: Vec<String>,
    pub ai_insights: AiInsights,
    pub social_posts: SocialPosts,
    pub scraped_title: String,
    pub scraped_description: String,
    /// Set once at creation, never mutated.
    pub analyzed_at: DateTime<Utc>,
}
