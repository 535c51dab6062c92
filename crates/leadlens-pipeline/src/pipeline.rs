//! The orchestrator itself.

use leadlens_analysis::{fallback_posts, AnalysisClient};
use leadlens_core::{contacts, merge, AppConfig, CompanyAnalysis, ContactSet, EnrichmentResult, SocialPosts, UNKNOWN_SENTINEL};
use leadlens_db::{get_lead, insert_lead, update_lead, update_social_posts, LeadRow};
use leadlens_scrape::{ScrapeClient, ScrapedPage};
use leadlens_search::SearchClient;
use leadlens_webhook::{
    high_score_payload, lead_analyzed_payload, social_post_payload, WebhookClient, WebhookEvent,
};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::PipelineError;

const SOCIAL_POST_TONE: &str = "professional";

/// Holds all adapter clients plus the webhook targets.
///
/// Analysis and search are optional: each is constructed only when its API
/// key is configured, and the pipeline degrades per the partial-failure
/// policy when one is absent.
pub struct Pipeline {
    scrape: ScrapeClient,
    analysis: Option<AnalysisClient>,
    search: Option<SearchClient>,
    webhooks: WebhookClient,
    lead_analyzed_url: Option<String>,
    high_score_url: Option<String>,
    social_post_url: Option<String>,
}

impl Pipeline {
    /// Builds every adapter client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Init`] if any HTTP client cannot be
    /// constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let scrape = ScrapeClient::new(
            &config.scrape_base_url,
            config.scrape_api_key.as_deref(),
            config.scrape_timeout_secs,
            config.scrape_max_retries,
            config.scrape_retry_backoff_secs,
        )
        .map_err(|e| PipelineError::Init {
            component: "scrape",
            detail: e.to_string(),
        })?;

        let analysis = config
            .analysis_api_key
            .as_deref()
            .map(|key| {
                AnalysisClient::new(
                    &config.analysis_base_url,
                    Some(key),
                    &config.analysis_model,
                    config.analysis_timeout_secs,
                )
            })
            .transpose()
            .map_err(|e| PipelineError::Init {
                component: "analysis",
                detail: e.to_string(),
            })?;

        let search = config
            .search_api_key
            .as_deref()
            .map(|key| SearchClient::new(&config.search_base_url, Some(key), config.search_timeout_secs))
            .transpose()
            .map_err(|e| PipelineError::Init {
                component: "search",
                detail: e.to_string(),
            })?;

        let webhooks = WebhookClient::new(config.webhook_timeout_secs).map_err(|e| {
            PipelineError::Init {
                component: "webhook",
                detail: e.to_string(),
            }
        })?;

        Ok(Self {
            scrape,
            analysis,
            search,
            webhooks,
            lead_analyzed_url: config.webhook_lead_analyzed_url.clone(),
            high_score_url: config.webhook_high_score_url.clone(),
            social_post_url: config.webhook_social_post_url.clone(),
        })
    }

    /// Runs the full pipeline for one website and persists the result.
    ///
    /// Scrape failure is fatal. Analysis failure substitutes the fallback
    /// record; search failure or absence skips enrichment. Webhook outcomes
    /// never affect the returned lead.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Scrape`] — the site could not be scraped.
    /// - [`PipelineError::Db`] — the lead could not be persisted.
    pub async fn analyze(
        &self,
        pool: &PgPool,
        owner_id: Option<Uuid>,
        url: &str,
    ) -> Result<LeadRow, PipelineError> {
        let page = self
            .scrape
            .scrape(url)
            .await
            .map_err(|source| PipelineError::Scrape {
                url: url.to_owned(),
                source,
            })?;

        let extracted = contacts::extract(&page.content, &page.links);

        // Company name is not known yet, so the search query falls through
        // to the hostname.
        let query = search_query("", url);
        let (analysis, enrichment) =
            tokio::join!(self.run_analysis(&page), self.run_search(&query));

        let posts = self.generate_posts(&analysis).await;

        let mut snapshot = merge::merge(url, &analysis, &extracted, enrichment.as_ref(), None);
        snapshot.social_posts = posts;
        snapshot.scraped_title = page.title.clone();
        snapshot.scraped_description = page.description.clone();

        let lead = insert_lead(pool, owner_id, &snapshot).await?;
        info!(url, lead_id = %lead.id, score = lead.lead_score, "lead analyzed");

        self.webhooks
            .dispatch(
                pool,
                WebhookEvent::LeadAnalyzed,
                self.lead_analyzed_url.as_deref(),
                &lead_analyzed_payload(&lead),
            )
            .await;
        self.webhooks
            .dispatch_high_score(
                pool,
                self.high_score_url.as_deref(),
                lead.lead_score,
                &high_score_payload(&lead),
            )
            .await;

        Ok(lead)
    }

    /// Re-enriches a persisted lead from search and writes the merge back.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::ConfigurationMissing`] — no search API key.
    /// - [`PipelineError::NotFound`] — no such lead for this owner.
    /// - [`PipelineError::Search`] — the search request failed.
    /// - [`PipelineError::Db`] — load or save failed.
    pub async fn enrich(
        &self,
        pool: &PgPool,
        owner_id: Option<Uuid>,
        lead_id: Uuid,
    ) -> Result<LeadRow, PipelineError> {
        let search = self
            .search
            .as_ref()
            .ok_or(PipelineError::ConfigurationMissing("search adapter"))?;

        let row = get_lead(pool, lead_id, owner_id)
            .await?
            .ok_or(PipelineError::NotFound)?;
        let snapshot = row.snapshot();

        let query = search_query(&snapshot.company_name, &snapshot.url);
        let enrichment = search.search_company(&query).await?;

        // Analysis and contacts are not re-run; the persisted snapshot is
        // the base and only enrichment rules apply.
        let merged = merge::merge(
            &snapshot.url,
            &CompanyAnalysis::default(),
            &ContactSet::default(),
            Some(&enrichment),
            Some(&snapshot),
        );

        let updated = update_lead(pool, row.id, &merged).await?;
        info!(lead_id = %updated.id, query, "lead re-enriched");
        Ok(updated)
    }

    /// Stores a social post on a lead and fires the `social_post` webhook.
    ///
    /// `platform` is `"twitter"` or `"linkedin"` (case-insensitive); the
    /// pipeline owns this contract, callers pass the value through.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::UnsupportedPlatform`] — platform is not one of
    ///   the two publishable channels.
    /// - [`PipelineError::NotFound`] — no such lead for this owner.
    /// - [`PipelineError::Db`] — save failed.
    pub async fn store_social_post(
        &self,
        pool: &PgPool,
        owner_id: Option<Uuid>,
        lead_id: Uuid,
        platform: &str,
        message: &str,
    ) -> Result<LeadRow, PipelineError> {
        if !platform.eq_ignore_ascii_case("twitter") && !platform.eq_ignore_ascii_case("linkedin") {
            return Err(PipelineError::UnsupportedPlatform {
                platform: platform.to_owned(),
            });
        }

        let row = get_lead(pool, lead_id, owner_id)
            .await?
            .ok_or(PipelineError::NotFound)?;

        let mut posts = row.social_posts.0.clone();
        if platform.eq_ignore_ascii_case("twitter") {
            posts.twitter = Some(message.to_owned());
        } else {
            posts.linkedin = Some(message.to_owned());
        }

        let updated = match update_social_posts(pool, row.id, owner_id, &posts).await {
            Ok(row) => row,
            Err(leadlens_db::DbError::NotFound) => return Err(PipelineError::NotFound),
            Err(e) => return Err(e.into()),
        };

        self.webhooks
            .dispatch(
                pool,
                WebhookEvent::SocialPost,
                self.social_post_url.as_deref(),
                &social_post_payload(&updated, platform, message),
            )
            .await;

        Ok(updated)
    }

    async fn run_analysis(&self, page: &ScrapedPage) -> CompanyAnalysis {
        let Some(client) = &self.analysis else {
            warn!(url = %page.url, "analysis adapter not configured, using fallback record");
            return CompanyAnalysis::fallback(&page.title);
        };

        match client
            .analyze_company(&page.url, &page.title, &page.description, &page.content)
            .await
        {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(url = %page.url, error = %e, "analysis failed, using fallback record");
                CompanyAnalysis::fallback(&page.title)
            }
        }
    }

    async fn run_search(&self, query: &str) -> Option<EnrichmentResult> {
        let client = self.search.as_ref()?;
        match client.search_company(query).await {
            Ok(enrichment) => Some(enrichment),
            Err(e) => {
                warn!(query, error = %e, "search enrichment failed, skipping");
                None
            }
        }
    }

    async fn generate_posts(&self, company: &CompanyAnalysis) -> SocialPosts {
        let Some(client) = &self.analysis else {
            return fallback_posts(company);
        };
        match client.generate_social_posts(company, SOCIAL_POST_TONE).await {
            Ok(posts) => posts,
            Err(e) => {
                warn!(company = %company.company_name, error = %e, "social post generation failed, using fallback");
                fallback_posts(company)
            }
        }
    }
}

/// Derives the search query for a lead: company name when known, otherwise
/// the hostname of the lead URL, otherwise the raw URL string.
fn search_query(company_name: &str, url: &str) -> String {
    let name = company_name.trim();
    if !name.is_empty() && name != UNKNOWN_SENTINEL {
        return name.to_owned();
    }
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(ToOwned::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
