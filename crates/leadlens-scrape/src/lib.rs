//! HTTP client for the web-content extraction service.
//!
//! The scrape service takes a website URL and returns the page's main
//! content as markdown plus metadata and outbound links. This crate wraps
//! it with typed errors, a bounded timeout, and retry with back-off on
//! transient failures.

mod client;
mod error;
mod retry;
mod types;

pub use client::ScrapeClient;
pub use error::ScrapeError;
pub use types::ScrapedPage;
