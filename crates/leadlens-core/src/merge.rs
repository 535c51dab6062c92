//! The merge engine: combines analysis output, extracted contacts, and
//! optional search enrichment into one canonical [`LeadSnapshot`].
//!
//! Precedence is fill-only: a later source writes a field only when the
//! earlier source left it empty or at its sentinel default. The single
//! exception is `ai_insights.rating`/`reviews`, where enrichment always
//! wins because ratings are time-sensitive.

use chrono::Utc;

use crate::lead::{
    AiInsights, CompanyAnalysis, ContactSet, EnrichmentResult, LeadSnapshot, UNKNOWN_SENTINEL,
};
use crate::score;

/// Builds the canonical snapshot for a lead.
///
/// With `existing = None` a fresh snapshot is constructed from the analysis
/// record and contacts (the score is computed here so the snapshot is valid
/// immediately). With `existing = Some`, the persisted snapshot is the base
/// and only the enrichment rules are applied against it — analysis and
/// contacts are ignored, matching the re-enrichment flow where those
/// sources are not re-run.
///
/// Applying the same enrichment twice yields an identical snapshot.
#[must_use]
pub fn merge(
    url: &str,
    analysis: &CompanyAnalysis,
    contacts: &ContactSet,
    enrichment: Option<&EnrichmentResult>,
    existing: Option<&LeadSnapshot>,
) -> LeadSnapshot {
    let mut snapshot = match existing {
        Some(lead) => lead.clone(),
        None => base_snapshot(url, analysis, contacts),
    };

    if let Some(enrichment) = enrichment {
        apply_enrichment(&mut snapshot, enrichment);
        // A fresh lead is scored against the fully merged contact set so
        // enrichment-sourced social links count; a persisted lead keeps
        // its stored score through re-enrichment.
        if existing.is_none() {
            snapshot.lead_score = score::lead_score(analysis, &snapshot.contacts);
        }
    }

    snapshot
}

/// Fresh snapshot sourced from analysis + contacts alone.
fn base_snapshot(url: &str, analysis: &CompanyAnalysis, contacts: &ContactSet) -> LeadSnapshot {
    LeadSnapshot {
        url: url.to_string(),
        company_name: analysis.company_name.clone(),
        industry: analysis.industry.clone(),
        company_size: analysis.company_size.clone(),
        location: analysis.location.clone(),
        summary: analysis.summary.clone(),
        lead_score: score::lead_score(analysis, contacts),
        contacts: contacts.clone(),
        key_people: Vec::new(),
        tech_stack: analysis.tech_stack.clone(),
        services: analysis.services.clone(),
        pain_points: analysis.pain_points.clone(),
        ai_insights: AiInsights {
            target_audience: non_empty(&analysis.target_audience),
            value_proposition: non_empty(&analysis.value_proposition),
            key_features: if analysis.key_features.is_empty() {
                None
            } else {
                Some(analysis.key_features.clone())
            },
            rating: None,
            reviews: None,
        },
        social_posts: crate::lead::SocialPosts::default(),
        scraped_title: String::new(),
        scraped_description: String::new(),
        analyzed_at: Utc::now(),
    }
}

/// Applies the enrichment precedence rules in place.
///
/// - `location`: filled only when empty or the `"Unknown"` sentinel.
/// - `summary`: filled only when empty.
/// - `url`: never touched.
/// - `social_links`: set union, first-seen order preserved.
/// - `key_people`: append-only by exact name; existing entries are never
///   replaced or reordered.
/// - `rating`/`reviews`: overwritten whenever enrichment carries a rating.
pub fn apply_enrichment(snapshot: &mut LeadSnapshot, enrichment: &EnrichmentResult) {
    let location_missing =
        snapshot.location.is_empty() || snapshot.location == UNKNOWN_SENTINEL;
    if location_missing && !enrichment.location.is_empty() {
        snapshot.location = enrichment.location.clone();
    }

    if snapshot.summary.is_empty() && !enrichment.snippet.is_empty() {
        snapshot.summary = enrichment.snippet.clone();
    }

    for link in &enrichment.social_links {
        if !snapshot.contacts.social_links.contains(link) {
            snapshot.contacts.social_links.push(link.clone());
        }
    }

    for person in &enrichment.key_people {
        if !snapshot.key_people.iter().any(|p| p.name == person.name) {
            snapshot.key_people.push(person.clone());
        }
    }

    if let Some(rating) = enrichment.rating {
        snapshot.ai_insights.rating = Some(rating);
        snapshot.ai_insights.reviews = Some(enrichment.reviews);
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
