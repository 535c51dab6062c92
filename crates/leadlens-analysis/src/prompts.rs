//! Prompt templates for the analysis service.

use leadlens_core::CompanyAnalysis;

/// Truncation applied to page content before prompting, in bytes.
const MAX_CONTENT_LEN: usize = 8_000;

/// Builds the company-analysis prompt for one scraped page.
pub(crate) fn analysis_prompt(url: &str, title: &str, description: &str, content: &str) -> String {
    let content = truncate_on_char_boundary(content, MAX_CONTENT_LEN);
    format!(
        "Analyze the following website content for a B2B sales prospect and extract \
company information in JSON format.\n\n\
Website URL: {url}\n\
Title: {title}\n\
Description: {description}\n\
Content: {content}\n\n\
Instructions:\n\
1. Be specific. Avoid \"Unknown\" or generic terms.\n\
2. For \"painPoints\", infer the problems their customers face that this company solves.\n\
3. For \"summary\", write a 2-3 sentence executive summary of what this company does, \
written in a professional tone suitable for a sales briefing.\n\n\
Extract the following information and return ONLY a valid JSON object:\n\
{{\n\
  \"companyName\": \"Company name\",\n\
  \"industry\": \"Primary industry/sector\",\n\
  \"companySize\": \"Estimated company size\",\n\
  \"location\": \"Company location/headquarters\",\n\
  \"services\": [\"List of main services or products offered\"],\n\
  \"painPoints\": [\"List of customer pain points this company addresses\"],\n\
  \"targetAudience\": \"Who are their ideal customers\",\n\
  \"valueProposition\": \"Main value proposition\",\n\
  \"techStack\": [\"Detected technologies or tools they mention using\"],\n\
  \"keyFeatures\": [\"Key features or differentiators\"],\n\
  \"summary\": \"2-3 sentence executive summary of the company\"\n\
}}\n\n\
Return ONLY the JSON object, no additional text.\n"
    )
}

/// Builds the social-post prompt for a lead's company record.
pub(crate) fn social_post_prompt(company: &CompanyAnalysis, tone: &str) -> String {
    format!(
        "Create two social media posts tailored to the company below: one comprehensive \
LinkedIn post (professional, engaging, 5-8 short paragraphs, 300-500 words, no hashtags) \
and one Twitter/X post (concise, <=280 characters, 1-2 relevant hashtags). Return ONLY \
valid JSON with two fields: {{\"linkedin\": \"...\", \"twitter\": \"...\"}}.\n\n\
Company: {name}\n\
Industry: {industry}\n\
Summary: {summary}\n\
Value Proposition: {value_proposition}\n\
Services: {services}\n\
Pain Points: {pain_points}\n\
Key Features: {key_features}\n\
Target Audience: {target_audience}\n\n\
Tone: {tone}\n\n\
The LinkedIn post must open with a hook, state the audience's pain points, introduce \
{name} and its value proposition, detail concrete benefits and differentiators, and end \
with a soft call to action. Use line breaks between paragraphs; avoid buzzwords.\n\n\
Return ONLY the JSON object with no additional text or explanation.\n",
        name = company.company_name,
        industry = company.industry,
        summary = company.summary,
        value_proposition = company.value_proposition,
        services = company.services.join(", "),
        pain_points = company.pain_points.join(", "),
        key_features = company.key_features.join(", "),
        target_audience = company.target_audience,
    )
}

/// Truncates to at most `max` bytes without splitting a UTF-8 character.
fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
