use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod contacts;
pub mod lead;
pub mod merge;
pub mod score;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use lead::{
    AiInsights, CompanyAnalysis, ContactSet, EnrichmentResult, KeyPerson, LeadSnapshot,
    SocialPosts, UNKNOWN_SENTINEL,
};

/// Errors raised while loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
