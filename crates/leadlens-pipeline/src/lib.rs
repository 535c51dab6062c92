//! Orchestration of the full lead pipeline.
//!
//! Sequences scrape, contact extraction, concurrent analysis + search
//! enrichment, social-post generation, scoring, a single merge, persistence,
//! and webhook dispatch. Owns the partial-failure policy: scrape failures
//! are fatal, analysis failures recover to a fallback record, search
//! failures are skipped silently, webhook failures never surface.

mod error;
mod pipeline;

pub use error::PipelineError;
pub use pipeline::Pipeline;
