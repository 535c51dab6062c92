//! Lead quality scoring.
//!
//! Additive scoring over the analysis record and extracted contacts:
//! base 5, capped at 10, rounded to one decimal place. Deterministic and
//! total — absent list fields simply contribute nothing.

use crate::lead::{CompanyAnalysis, ContactSet};

/// Every score starts here; in practice it is also the floor, since all
/// signals are non-negative.
pub const BASE_SCORE: f64 = 5.0;

/// Maximum lead score.
pub const MAX_SCORE: f64 = 10.0;

/// Computes the lead quality score for a company and its contacts.
#[must_use]
pub fn lead_score(company: &CompanyAnalysis, contacts: &ContactSet) -> f64 {
    let mut score = BASE_SCORE;

    // Company size: mid/large companies are worth more; the brackets are
    // matched as substrings of whatever size text the analyzer produced.
    if company.company_size.contains("50-200") || company.company_size.contains("200+") {
        score += 2.0;
    } else if company.company_size.contains("10-50") {
        score += 1.0;
    }

    if !contacts.emails.is_empty() {
        score += 1.0;
    }
    if !contacts.phones.is_empty() {
        score += 0.5;
    }
    if !contacts.social_links.is_empty() {
        score += 0.5;
    }

    if company.services.len() >= 3 {
        score += 1.0;
    }
    if company.key_features.len() >= 3 {
        score += 0.5;
    }
    if company.tech_stack.len() >= 2 {
        score += 0.5;
    }

    ((score * 10.0).round() / 10.0).min(MAX_SCORE)
}
