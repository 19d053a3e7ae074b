//! Crawler module for page fetching and category export
//!
//! This module contains the network-facing half of the pipeline:
//! - HTTP fetching with retry logic and request spacing
//! - Paginated category traversal
//! - Cover image download
//! - Per-category CSV export
//! - Overall crawl coordination

mod coordinator;
mod exporter;
mod fetcher;
mod images;
mod listing;

pub use coordinator::Crawler;
pub use exporter::{CategoryExporter, ProductError};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use images::ImageDownloader;
pub use listing::PaginatedListing;

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Discover categories from the root page
/// 3. Export each category's products to CSV
/// 4. Download cover images
/// 5. Return the run summary
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl finished, possibly with skipped products or categories
/// * `Err(CrawlError)` - Crawl could not start or categories could not be discovered
pub async fn crawl(config: Config) -> Result<CrawlSummary, CrawlError> {
    Crawler::new(config)?.run().await
}
