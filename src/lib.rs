//! Casafeed: a two-stage real-estate listing crawler
//!
//! This crate crawls a paginated listing API, enriches every record with data
//! scraped from its detail page, normalizes the free-text fields, and hands
//! the accumulated collection to the output layer. Detail responses are tied
//! back to their index records through a correlation registry, and all
//! fetching runs on a bounded, rate-limited worker pool.

pub mod config;
pub mod crawler;
pub mod listing;
pub mod normalize;
pub mod output;
pub mod sites;

use thiserror::Error;

/// Main error type for casafeed operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Domain not allowed: {url}")]
    DomainNotAllowed { url: String },

    #[error("Depth {depth} exceeds the configured maximum for {url}")]
    DepthExceeded { url: String, depth: u32 },

    #[error("No crawl context associated with detail response from {url}")]
    MissingContext { url: String },

    #[error("Unknown crawler: {0}")]
    UnknownCrawler(String),

    #[error("Invalid selector {selector}: {message}")]
    Selector { selector: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload to {destination} failed: {message}")]
    Upload { destination: String, message: String },
}

impl CrawlError {
    /// Whether this error must halt response processing for the whole run.
    ///
    /// Transport and decode failures only discard the affected response; a
    /// detail response that cannot be correlated back to its listing means
    /// the pipeline's bookkeeping is broken, so the run stops scheduling
    /// further work and keeps whatever was accumulated.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CrawlError::MissingContext { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type alias for casafeed operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Crawler;
pub use listing::{Listing, PagingInfo, SearchEnvelope};
pub use sites::{AttributeField, SiteProfile};
