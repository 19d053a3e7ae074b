//! Console rendering of a crawl summary

use crate::output::CrawlSummary;

/// Prints the run summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!("  Root URL: {}", summary.root_url);
    println!("  Categories discovered: {}", summary.categories_discovered);
    println!("  Categories processed: {}", summary.categories_processed);
    println!("  Categories failed: {}", summary.categories_failed);
    println!("  Products written: {}", summary.products_written);
    println!("  Products skipped: {}", summary.product_failures);
    println!("  Images missing: {}", summary.image_failures);
    if let Some(duration) = summary.duration_seconds() {
        println!("  Duration: {}s", duration);
    }
    println!();

    if !summary.categories.is_empty() {
        println!("Categories:");
        for report in &summary.categories {
            match &report.error {
                Some(error) => println!(
                    "  ✗ {}: {} rows before failure ({})",
                    report.name, report.products_written, error
                ),
                None => println!(
                    "  ✓ {}: {} rows -> {}",
                    report.name,
                    report.products_written,
                    report.csv_path.display()
                ),
            }
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} products written)",
        summary.success_rate(),
        summary.products_written,
        summary.products_written + summary.product_failures
    );
}
