use serde::Deserialize;
use serde_json::Value;

/// Subset of the search response the extractor cares about.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SearchResponse {
    pub knowledge_graph: Option<KnowledgeGraph>,
    pub organic_results: Vec<OrganicResult>,
}

/// Knowledge-graph panel. Fields vary per query; `founders` and `ceo` in
/// particular arrive as a string, an object, or an array of either, so they
/// stay untyped until extraction.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct KnowledgeGraph {
    pub website: Option<String>,
    pub description: Option<String>,
    pub headquarters: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    pub profiles: Vec<Profile>,
    pub founders: Option<Value>,
    pub ceo: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Profile {
    pub link: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OrganicResult {
    pub link: String,
    pub title: String,
    pub snippet: String,
}
