//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of a crawl run,
//! including totals, a per-category table and the categories that failed.

use crate::output::{CrawlSummary, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report of `summary` to `output_path`
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Shelf-Crawler Run Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root URL**: {}\n", summary.root_url));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = summary.duration_seconds() {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Totals
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!(
        "- **Categories Discovered**: {}\n",
        summary.categories_discovered
    ));
    md.push_str(&format!(
        "- **Categories Processed**: {}\n",
        summary.categories_processed
    ));
    md.push_str(&format!(
        "- **Categories Failed**: {}\n",
        summary.categories_failed
    ));
    md.push_str(&format!(
        "- **Products Written**: {}\n",
        summary.products_written
    ));
    md.push_str(&format!(
        "- **Products Skipped**: {}\n",
        summary.product_failures
    ));
    md.push_str(&format!("- **Images Missing**: {}\n", summary.image_failures));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        summary.success_rate()
    ));

    if !summary.categories.is_empty() {
        md.push_str("## Categories\n\n");
        md.push_str("| Category | Rows | Skipped | Images Missing | CSV |\n");
        md.push_str("|----------|------|---------|----------------|-----|\n");

        for report in &summary.categories {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                report.name,
                report.products_written,
                report.product_failures,
                report.image_failures,
                report.csv_path.display()
            ));
        }
        md.push('\n');
    }

    let failed: Vec<_> = summary
        .categories
        .iter()
        .filter_map(|report| report.error.as_ref().map(|error| (&report.name, error)))
        .collect();
    if !failed.is_empty() {
        md.push_str("## Failed Categories\n\n");
        for (name, error) in failed {
            md.push_str(&format!("- **{}**: {}\n", name, error));
        }
        md.push('\n');
    }

    md
}
