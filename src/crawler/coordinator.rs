//! Crawl coordinator - whole-site orchestration
//!
//! Fetches the root page once, discovers the categories in sidebar order and
//! exports them one after another. A failed category is recorded in the
//! summary and the crawl moves on; only a failure to discover categories ends
//! the run early.

use crate::config::{Config, DEFAULT_CONFIG_HASH};
use crate::crawler::{CategoryExporter, HttpFetcher, PageFetcher};
use crate::extract::discover_categories;
use crate::model::Category;
use crate::output::{generate_markdown_summary, CategoryReport, CrawlSummary};
use crate::{CrawlError, ExportError};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// Main crawler structure
pub struct Crawler {
    config: Arc<Config>,
    fetcher: Arc<dyn PageFetcher>,
    config_hash: String,
}

impl Crawler {
    /// Creates a crawler that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - HTTP client built
    /// * `Err(CrawlError)` - The HTTP client could not be initialized
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Creates a crawler on top of any `PageFetcher`
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            config_hash: DEFAULT_CONFIG_HASH.to_string(),
        }
    }

    /// Records the hash of the config file this crawler was built from
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = hash.into();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> Arc<dyn PageFetcher> {
        Arc::clone(&self.fetcher)
    }

    /// Builds the exporter used for every category of this crawler
    pub fn exporter(&self) -> CategoryExporter {
        CategoryExporter::new(self.fetcher(), &self.config)
    }

    /// Fetches the root page and reads its category sidebar
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Category>)` - Categories in sidebar order
    /// * `Err(CrawlError)` - Root page unreachable or navigation missing
    pub async fn discover(&self) -> Result<Vec<Category>, CrawlError> {
        let root_url = Url::parse(&self.config.crawler.root_url)?;
        tracing::info!("Discovering categories from {}", root_url);

        let html = self.fetcher.fetch_page(root_url.as_str()).await?;
        let categories = discover_categories(&html, &root_url)?;

        tracing::info!("Found {} categories", categories.len());
        Ok(categories)
    }

    /// Crawls every discovered category
    pub async fn run(&self) -> Result<CrawlSummary, CrawlError> {
        self.run_filtered(&[]).await
    }

    /// Crawls the discovered categories whose names appear in `only`
    ///
    /// Names compare case-insensitively; an empty filter selects everything.
    pub async fn run_filtered(&self, only: &[String]) -> Result<CrawlSummary, CrawlError> {
        let started_at = Utc::now();
        let discovered = self.discover().await?;
        let selected = select_categories(&discovered, only);

        let mut summary = CrawlSummary::new(
            started_at,
            &self.config.crawler.root_url,
            &self.config_hash,
        );
        summary.categories_discovered = discovered.len();

        let exporter = self.exporter();
        let total = selected.len();
        for (index, category) in selected.into_iter().enumerate() {
            tracing::info!(
                "Processing category {}/{}: '{}' ({})",
                index + 1,
                total,
                category.name,
                category.listing_url
            );

            match exporter.export(category).await {
                Ok(report) => summary.record(report),
                Err(e) => {
                    tracing::error!("Category '{}' failed: {}", category.name, e);
                    summary.record(failed_report(&exporter, category, &e));
                }
            }
        }

        summary.finished_at = Some(Utc::now());

        tracing::info!(
            "Crawl complete: {} categories processed, {} products written, {} failures",
            summary.categories_processed,
            summary.products_written,
            summary.failures()
        );

        if let Some(path) = &self.config.output.summary_path {
            match generate_markdown_summary(&summary, Path::new(path)) {
                Ok(()) => tracing::info!("Run report written to {}", path),
                Err(e) => tracing::warn!("Failed to write run report {}: {}", path, e),
            }
        }

        Ok(summary)
    }
}

fn select_categories<'c>(categories: &'c [Category], only: &[String]) -> Vec<&'c Category> {
    if only.is_empty() {
        return categories.iter().collect();
    }

    for wanted in only {
        if !categories.iter().any(|c| c.name.eq_ignore_ascii_case(wanted)) {
            tracing::warn!("Category '{}' not found on the site", wanted);
        }
    }

    categories
        .iter()
        .filter(|c| only.iter().any(|wanted| c.name.eq_ignore_ascii_case(wanted)))
        .collect()
}

fn failed_report(exporter: &CategoryExporter, category: &Category, error: &ExportError) -> CategoryReport {
    let mut report = error
        .partial_report()
        .cloned()
        .unwrap_or_else(|| CategoryReport::new(&category.name, exporter.csv_path(category)));
    report.error = Some(error.to_string());
    report
}
