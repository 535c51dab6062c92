//! HTTP client for the `generateContent` analysis endpoint.

use std::time::Duration;

use leadlens_core::{CompanyAnalysis, SocialPosts};
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::error::AnalysisError;
use crate::parse::extract_json_block;
use crate::prompts::{analysis_prompt, social_post_prompt};
use crate::types::GenerateResponse;

/// Client for the generative analysis service.
///
/// Use [`AnalysisClient::new`] for production or point `base_url` at a mock
/// server in tests. Like the scrape client, a missing API key is tolerated
/// at construction so misconfiguration surfaces as a normal HTTP error.
pub struct AnalysisClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl AnalysisClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("leadlens/0.1 (lead-intelligence)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.map(ToOwned::to_owned),
            base_url: base_url.trim_end_matches('/').to_owned(),
            model: model.to_owned(),
        })
    }

    /// Analyzes scraped page content into structured company data.
    ///
    /// Unrecognized fields in the model's JSON are ignored and missing ones
    /// default to empty, so a partially compliant response still yields a
    /// usable record.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::EmptyResponse`] — the model returned no text.
    /// - [`AnalysisError::MissingJsonBlock`] — the text contained no braces.
    /// - [`AnalysisError::Deserialize`] — the extracted block is not valid
    ///   JSON or does not match the expected shape.
    /// - [`AnalysisError::UnexpectedStatus`] / [`AnalysisError::Http`] — the
    ///   request itself failed.
    pub async fn analyze_company(
        &self,
        url: &str,
        title: &str,
        description: &str,
        content: &str,
    ) -> Result<CompanyAnalysis, AnalysisError> {
        let prompt = analysis_prompt(url, title, description, content);
        let text = self.generate(&prompt).await?;

        let block = extract_json_block(&text).ok_or_else(|| AnalysisError::MissingJsonBlock {
            context: format!("company analysis for {url}"),
        })?;

        let analysis: CompanyAnalysis =
            serde_json::from_str(block).map_err(|e| AnalysisError::Deserialize {
                context: format!("company analysis for {url}"),
                source: e,
            })?;

        debug!(url, company = %analysis.company_name, "analyzed company");
        Ok(analysis)
    }

    /// Generates a LinkedIn and a Twitter/X post for a lead.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`AnalysisClient::analyze_company`].
    pub async fn generate_social_posts(
        &self,
        company: &CompanyAnalysis,
        tone: &str,
    ) -> Result<SocialPosts, AnalysisError> {
        let prompt = social_post_prompt(company, tone);
        let text = self.generate(&prompt).await?;

        let block = extract_json_block(&text).ok_or_else(|| AnalysisError::MissingJsonBlock {
            context: format!("social posts for {}", company.company_name),
        })?;

        serde_json::from_str(block).map_err(|e| AnalysisError::Deserialize {
            context: format!("social posts for {}", company.company_name),
            source: e,
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let mut request = self.client.post(&endpoint).json(&json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "maxOutputTokens": 2048,
                "temperature": 0.7,
            },
        }));

        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AnalysisError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let envelope: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| AnalysisError::Deserialize {
                context: "generateContent response".to_owned(),
                source: e,
            })?;

        envelope
            .first_candidate_text()
            .ok_or(AnalysisError::EmptyResponse)
    }
}

/// Fixed social posts used when the analysis service is unavailable.
///
/// Flat, descriptive copy built from fields already on the record so a
/// social-post request always returns something publishable.
pub fn fallback_posts(company: &CompanyAnalysis) -> SocialPosts {
    SocialPosts {
        linkedin: Some(format!(
            "Spotlight on {name}: {summary} Learn more about what they offer in {industry}.",
            name = company.company_name,
            summary = company.summary,
            industry = company.industry,
        )),
        twitter: Some(format!(
            "Check out {name} — {proposition}",
            name = company.company_name,
            proposition = if company.value_proposition.is_empty() {
                company.summary.as_str()
            } else {
                company.value_proposition.as_str()
            },
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_posts_use_company_fields() {
        let company = CompanyAnalysis {
            company_name: "Acme".to_owned(),
            industry: "Manufacturing".to_owned(),
            summary: "Acme builds widgets.".to_owned(),
            value_proposition: "Widgets that last.".to_owned(),
            ..CompanyAnalysis::default()
        };

        let posts = fallback_posts(&company);
        let linkedin = posts.linkedin.as_deref().unwrap_or_default();
        let twitter = posts.twitter.as_deref().unwrap_or_default();
        assert!(linkedin.contains("Acme"));
        assert!(linkedin.contains("Acme builds widgets."));
        assert!(twitter.contains("Widgets that last."));
    }

    #[test]
    fn fallback_twitter_falls_back_to_summary() {
        let company = CompanyAnalysis {
            company_name: "Acme".to_owned(),
            summary: "Acme builds widgets.".to_owned(),
            ..CompanyAnalysis::default()
        };

        let posts = fallback_posts(&company);
        assert!(posts
            .twitter
            .as_deref()
            .unwrap_or_default()
            .contains("Acme builds widgets."));
    }
}
