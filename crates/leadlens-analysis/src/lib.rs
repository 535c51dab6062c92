//! HTTP client for the generative-text analysis service.
//!
//! The analyzer receives scraped page content and returns structured
//! company data plus outreach drafts. Model output is free-form text that
//! embeds a JSON object; this crate extracts and validates that block and
//! provides the fixed fallback used when the analyzer is unavailable.

mod client;
mod error;
mod parse;
mod prompts;
mod types;

pub use client::{fallback_posts, AnalysisClient};
pub use error::AnalysisError;
