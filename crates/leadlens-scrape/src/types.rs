use serde::{Deserialize, Serialize};

/// A scraped page as consumed by the rest of the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    pub title: String,
    pub description: String,
    /// Markdown when the service produced it, raw HTML otherwise.
    pub content: String,
    pub links: Vec<String>,
}

/// Wire envelope returned by the scrape service.
#[derive(Debug, Deserialize)]
pub(crate) struct ScrapeEnvelope {
    #[serde(default)]
    pub success: bool,
    pub data: Option<ScrapeData>,
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ScrapeData {
    pub markdown: Option<String>,
    pub html: Option<String>,
    pub links: Vec<String>,
    pub metadata: PageMetadata,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PageMetadata {
    pub title: String,
    pub description: String,
}
