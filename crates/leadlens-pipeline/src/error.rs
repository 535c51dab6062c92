use leadlens_db::DbError;
use leadlens_scrape::ScrapeError;
use leadlens_search::SearchError;
use thiserror::Error;

/// Errors the orchestrator surfaces to callers.
///
/// Analysis and webhook failures are recovered internally and never appear
/// here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The site could not be scraped; no lead is created.
    #[error("failed to scrape {url}")]
    Scrape {
        url: String,
        #[source]
        source: ScrapeError,
    },

    /// Explicit re-enrichment failed; unlike during analysis, the caller
    /// asked for enrichment specifically, so the error propagates.
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Db(#[from] DbError),

    /// An operation requires an adapter that has no API key configured.
    #[error("{0} is not configured")]
    ConfigurationMissing(&'static str),

    /// The lead does not exist or belongs to a different owner.
    #[error("lead not found")]
    NotFound,

    /// A social post targeted a platform the system does not publish to.
    #[error("unsupported social platform \"{platform}\"")]
    UnsupportedPlatform { platform: String },

    /// An HTTP client could not be constructed at startup.
    #[error("failed to initialize {component} client: {detail}")]
    Init {
        component: &'static str,
        detail: String,
    },
}
