//! Contact extraction from scraped page content.
//!
//! Pure, total functions: any input (including empty) yields a valid
//! [`ContactSet`]. Values are reported exactly as they appear in the source
//! text — phone numbers are not normalized to E.164.

use std::collections::HashSet;

use regex::Regex;

use crate::lead::ContactSet;

/// Platform names matched case-insensitively as substrings of link URLs.
const SOCIAL_PLATFORMS: &[&str] = &["linkedin", "twitter", "facebook", "instagram", "youtube"];

/// Extracts emails and phone numbers from `content` and filters `links`
/// down to social profile URLs.
#[must_use]
pub fn extract(content: &str, links: &[String]) -> ContactSet {
    ContactSet {
        emails: extract_emails(content),
        phones: extract_phones(content),
        social_links: extract_social_links(links),
    }
}

/// Matches permissive `local@domain.tld`-shaped tokens, deduplicated.
#[must_use]
pub fn extract_emails(content: &str) -> Vec<String> {
    let re = Regex::new(r"[\w.\-]+@[\w.\-]+\.\w+").expect("valid email regex");
    dedup_in_order(re.find_iter(content).map(|m| m.as_str().to_string()))
}

/// Matches phone-shaped substrings: optional `+country`, optional
/// parenthesized area code, and `-`, `.`, or space separators.
#[must_use]
pub fn extract_phones(content: &str) -> Vec<String> {
    let re = Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
        .expect("valid phone regex");
    dedup_in_order(re.find_iter(content).map(|m| m.as_str().to_string()))
}

/// Filters the supplied link list to those containing a known social
/// platform name (case-insensitive). Matching links are kept as scraped.
#[must_use]
pub fn extract_social_links(links: &[String]) -> Vec<String> {
    dedup_in_order(
        links
            .iter()
            .filter(|link| {
                let lower = link.to_lowercase();
                SOCIAL_PLATFORMS.iter().any(|p| lower.contains(p))
            })
            .cloned(),
    )
}

/// Removes duplicates while preserving first-occurrence order.
fn dedup_in_order(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}
