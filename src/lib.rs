//! Docmap: documentation site cartographer
//!
//! This crate crawls a documentation website, strips page chrome, infers a
//! module/submodule hierarchy from the heading structure and attaches a short
//! extractive description to every node.

pub mod config;
pub mod content;
pub mod crawler;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod robots;
pub mod state;
pub mod summarizer;
pub mod url;

use thiserror::Error;

/// Main error type for Docmap operations
#[derive(Debug, Error)]
pub enum DocmapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
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

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Docmap operations
pub type Result<T> = std::result::Result<T, DocmapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use content::{parse, ContentBlock, Heading, ParsedPage};
pub use crawler::{crawl, Crawler, FetchedPage};
pub use inference::{infer_modules, ModuleMap, ModuleNode, SubmoduleNode};
pub use output::{to_json, ModuleRecord};
pub use pipeline::{ExtractionResult, Pipeline};
pub use state::PageState;
pub use summarizer::{describe, Summarizer};
pub use crate::url::{extract_domain, normalize_url};
