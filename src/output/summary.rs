//! Run summary types
//!
//! This module defines the per-category report produced by an export and
//! the crawl-wide summary assembled from those reports.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Outcome of exporting one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    /// Category name as shown in the sidebar
    pub name: String,

    /// CSV file the category was written to
    pub csv_path: PathBuf,

    /// Rows written to the CSV file
    pub products_written: usize,

    /// Products skipped because their page could not be fetched or parsed
    pub product_failures: usize,

    /// Products written without a stored image
    pub image_failures: usize,

    /// Set when the export stopped before the listing was exhausted
    pub error: Option<String>,
}

impl CategoryReport {
    pub fn new(name: &str, csv_path: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            csv_path,
            products_written: 0,
            product_failures: 0,
            image_failures: 0,
            error: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary statistics for a crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    // Run metadata
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub root_url: String,
    pub config_hash: String,

    // Category counts
    pub categories_discovered: usize,
    pub categories_processed: usize,
    pub categories_failed: usize,

    // Product counts
    pub products_written: usize,
    pub product_failures: usize,
    pub image_failures: usize,

    /// Per-category reports in processing order
    pub categories: Vec<CategoryReport>,
}

impl CrawlSummary {
    pub fn new(started_at: DateTime<Utc>, root_url: &str, config_hash: &str) -> Self {
        Self {
            started_at,
            finished_at: None,
            root_url: root_url.to_string(),
            config_hash: config_hash.to_string(),
            categories_discovered: 0,
            categories_processed: 0,
            categories_failed: 0,
            products_written: 0,
            product_failures: 0,
            image_failures: 0,
            categories: Vec::new(),
        }
    }

    /// Folds one category report into the totals
    pub fn record(&mut self, report: CategoryReport) {
        if report.is_failed() {
            self.categories_failed += 1;
        } else {
            self.categories_processed += 1;
        }
        self.products_written += report.products_written;
        self.product_failures += report.product_failures;
        self.image_failures += report.image_failures;
        self.categories.push(report);
    }

    /// Skipped products plus failed categories
    ///
    /// Image failures are reported separately and do not count here.
    pub fn failures(&self) -> usize {
        self.product_failures + self.categories_failed
    }

    /// Wall-clock run time, once the run has finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Percentage of attempted products that reached a CSV file
    pub fn success_rate(&self) -> f64 {
        let attempted = self.products_written + self.product_failures;
        if attempted == 0 {
            return 0.0;
        }
        (self.products_written as f64 / attempted as f64) * 100.0
    }
}
