//! Output module for CSV files and run reports
//!
//! This module handles:
//! - Writing product rows to per-category CSV files
//! - Recording per-category and crawl-wide statistics
//! - Rendering run summaries to the console and to markdown

mod csv_output;
mod markdown;
pub mod stats;
mod summary;

pub use csv_output::{read_products, CsvSink};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::print_summary;
pub use summary::{CategoryReport, CrawlSummary, OutputError, OutputResult};
