//! Maps a raw search response onto an [`EnrichmentResult`].

use leadlens_core::{EnrichmentResult, KeyPerson};
use serde_json::Value;

use crate::types::SearchResponse;

const SOCIAL_DOMAINS: [&str; 4] = [
    "linkedin.com",
    "twitter.com",
    "facebook.com",
    "instagram.com",
];

const EXECUTIVE_TITLES: [&str; 4] = ["CEO", "Founder", "President", "Director"];

/// Builds an enrichment record, preferring knowledge-graph fields and
/// falling back to organic results for whatever the graph left empty.
pub(crate) fn enrichment_from_response(response: &SearchResponse) -> EnrichmentResult {
    let mut enriched = EnrichmentResult::default();

    if let Some(kg) = &response.knowledge_graph {
        if let Some(website) = &kg.website {
            enriched.website = website.clone();
        }
        if let Some(description) = &kg.description {
            enriched.snippet = description.clone();
        }
        if let Some(headquarters) = &kg.headquarters {
            enriched.location = headquarters.clone();
        }
        enriched.rating = kg.rating;
        enriched.reviews = kg.review_count.unwrap_or(0);
        enriched.social_links = kg.profiles.iter().map(|p| p.link.clone()).collect();

        if let Some(founders) = &kg.founders {
            enriched.key_people.extend(people_from_value(founders, "Founder"));
        }
        if let Some(ceo) = &kg.ceo {
            enriched.key_people.extend(people_from_value(ceo, "CEO"));
        }
    }

    if let Some(first) = response.organic_results.first() {
        if enriched.website.is_empty() {
            enriched.website = first.link.clone();
        }
        if enriched.snippet.is_empty() {
            enriched.snippet = first.snippet.clone();
        }
    }

    if enriched.social_links.is_empty() {
        for result in &response.organic_results {
            if SOCIAL_DOMAINS.iter().any(|d| result.link.contains(d)) {
                enriched.social_links.push(result.link.clone());
            }
        }
    }

    if enriched.key_people.is_empty() {
        for result in &response.organic_results {
            if let Some(person) = person_from_profile_result(&result.title, &result.link) {
                enriched.key_people.push(person);
            }
        }
    }

    enriched
}

/// Normalizes a string, an object with `name`/`link`, or an array of either
/// into key-people entries with the given role.
fn people_from_value(value: &Value, role: &str) -> Vec<KeyPerson> {
    let entries: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    entries
        .into_iter()
        .filter_map(|entry| {
            let (name, link) = match entry {
                Value::String(name) => (name.clone(), String::new()),
                Value::Object(map) => {
                    let name = map.get("name")?.as_str()?.to_owned();
                    let link = map
                        .get("link")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned();
                    (name, link)
                }
                _ => return None,
            };
            if name.is_empty() {
                return None;
            }
            Some(KeyPerson {
                name,
                role: role.to_owned(),
                link,
            })
        })
        .collect()
}

/// Heuristic for organic results pointing at a personal profile page.
///
/// Titles there usually read "Name - Role - Company | Site"; the name is the
/// first segment and the role is guessed from the title text.
fn person_from_profile_result(title: &str, link: &str) -> Option<KeyPerson> {
    if !link.contains("linkedin.com/in/") {
        return None;
    }
    if !EXECUTIVE_TITLES.iter().any(|t| title.contains(t)) {
        return None;
    }

    let name = title
        .split(['-', '|'])
        .next()
        .map(str::trim)
        .filter(|n| !n.is_empty())?;

    let role = if title.contains("CEO") {
        "CEO"
    } else if title.contains("Founder") {
        "Founder"
    } else {
        "Key Executive"
    };

    Some(KeyPerson {
        name: name.to_owned(),
        role: role.to_owned(),
        link: link.to_owned(),
    })
}
