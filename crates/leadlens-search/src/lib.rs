//! HTTP client for the web-search enrichment service.
//!
//! One query in, one [`leadlens_core::EnrichmentResult`] out. The knowledge
//! graph is the preferred source; organic results back-fill the website,
//! snippet, social links, and key people when the graph is absent or thin.

mod client;
mod error;
mod extract;
mod types;

pub use client::SearchClient;
pub use error::SearchError;
