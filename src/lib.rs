//! Shelf-Crawler: a catalogue harvester for static bookshop sites
//!
//! This crate walks a bookshop's category sidebar, follows each category's
//! paginated listing, extracts every product page into a structured record,
//! downloads cover images and writes one CSV file per category.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Shelf-Crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to retrieve a resource over HTTP
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Failed to read response body from {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// The URL the failed request was addressed to
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. }
            | Self::Timeout { url }
            | Self::Network { url, .. }
            | Self::Body { url, .. } => url,
        }
    }

    /// Returns true for failures worth another attempt (5xx and timeouts)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500,
            Self::Timeout { .. } => true,
            Self::Network { source, .. } => source.is_timeout(),
            Self::Body { .. } => false,
        }
    }
}

/// A product page is missing data every CSV row requires
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Missing mandatory field '{field}' on {url}")]
    MissingField { url: String, field: &'static str },

    #[error("Invalid value '{value}' for field '{field}' on {url}")]
    InvalidField {
        url: String,
        field: &'static str,
        value: String,
    },

    #[error("Price excluding tax ({excluding}) exceeds price including tax ({including}) on {url}")]
    InconsistentPrices {
        url: String,
        including: String,
        excluding: String,
    },
}

/// The site-wide category navigation could not be found
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Category navigation not found on {url}")]
    MissingNavigation { url: String },
}

/// Failure to download or store a product image
#[derive(Debug, Error)]
pub enum ImageFetchError {
    #[error("Product {upc} has no image URL")]
    MissingUrl { upc: String },

    #[error("Failed to fetch image: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to store image at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// A category export could not be completed
///
/// `Listing` and `Csv` carry the report of everything done before the export
/// stopped, so rows written and products skipped still reach the run summary.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(
        "Listing failed for category '{}' after {} rows: {}",
        .report.name,
        .report.products_written,
        .source
    )]
    Listing {
        report: Box<CategoryReport>,
        source: FetchError,
    },

    #[error(
        "Failed to write CSV for category '{}' after {} rows: {}",
        .report.name,
        .report.products_written,
        .source
    )]
    Csv {
        report: Box<CategoryReport>,
        source: csv::Error,
    },

    #[error("IO error for category '{category}': {source}")]
    Io {
        category: String,
        source: std::io::Error,
    },
}

impl ExportError {
    /// Progress made before the export stopped, if it got as far as the CSV file
    pub fn partial_report(&self) -> Option<&CategoryReport> {
        match self {
            Self::Listing { report, .. } | Self::Csv { report, .. } => Some(report),
            Self::Io { .. } => None,
        }
    }
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

/// Result type alias for Shelf-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CategoryExporter, Crawler, HttpFetcher, ImageDownloader, PageFetcher};
pub use model::{Category, Product, StarRating};
pub use output::{CategoryReport, CrawlSummary};
