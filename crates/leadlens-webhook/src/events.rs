//! Event names and payload builders for outbound webhooks.

use chrono::{DateTime, Utc};
use leadlens_db::LeadRow;
use serde_json::{json, Value};
use uuid::Uuid;

/// Downstream automation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookEvent {
    Signup,
    LeadAnalyzed,
    HighScoreLead,
    SocialPost,
}

impl WebhookEvent {
    /// Wire name, also the value stored in `webhook_logs.event`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signup => "user_signup",
            Self::LeadAnalyzed => "lead_analyzed",
            Self::HighScoreLead => "high_score_lead",
            Self::SocialPost => "social_post",
        }
    }
}

impl std::fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn contacts_json(lead: &LeadRow) -> Value {
    json!({
        "emails": lead.emails,
        "phones": lead.phones,
        "socialLinks": lead.social_links,
    })
}

/// Payload for the `lead_analyzed` event fired after every pipeline run.
#[must_use]
pub fn lead_analyzed_payload(lead: &LeadRow) -> Value {
    json!({
        "leadId": lead.id,
        "ownerId": lead.owner_id,
        "companyName": lead.company_name,
        "industry": lead.industry,
        "leadScore": lead.lead_score,
        "url": lead.url,
        "contacts": contacts_json(lead),
        "analyzedAt": lead.analyzed_at,
    })
}

/// Payload for the gated `high_score_lead` event.
#[must_use]
pub fn high_score_payload(lead: &LeadRow) -> Value {
    json!({
        "leadId": lead.id,
        "ownerId": lead.owner_id,
        "companyName": lead.company_name,
        "industry": lead.industry,
        "leadScore": lead.lead_score,
        "url": lead.url,
        "contacts": contacts_json(lead),
        "socialPosts": lead.social_posts.0,
    })
}

/// Payload for the `social_post` event fired when a post is stored on a lead.
#[must_use]
pub fn social_post_payload(lead: &LeadRow, platform: &str, message: &str) -> Value {
    json!({
        "leadId": lead.id,
        "companyName": lead.company_name,
        "url": lead.url,
        "platform": platform,
        "message": message,
    })
}

/// Payload for the `user_signup` event.
#[must_use]
pub fn signup_payload(
    user_id: Uuid,
    name: &str,
    email: &str,
    created_at: DateTime<Utc>,
) -> Value {
    json!({
        "userId": user_id,
        "name": name,
        "email": email,
        "createdAt": created_at,
    })
}
