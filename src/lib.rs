//! Media-Mirror: a polite single-origin media crawler
//!
//! This crate walks the pages of one website breadth-first, collects the
//! product images those pages reference, and mirrors each image exactly once
//! into a local directory tree that reproduces the remote URL paths.

pub mod config;
pub mod crawler;
pub mod download;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Media-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Refusing to map {url} outside the mirror root")]
    UnsafePath { url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Media-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, Orchestrator};
pub use download::{DownloadOutcome, Downloader};
pub use output::RunSummary;
pub use state::UrlState;
pub use crate::url::{normalize, PathFilter};
