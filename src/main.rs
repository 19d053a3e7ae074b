//! Shelf-Crawler main entry point
//!
//! This is the command-line interface for the Shelf-Crawler catalogue harvester.

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_crawler::config::{load_config_with_hash, validate, Config, DEFAULT_CONFIG_HASH};
use shelf_crawler::crawler::{Crawler, ImageDownloader};
use shelf_crawler::extract::extract_product;
use shelf_crawler::model::Category;
use shelf_crawler::output::{print_summary, CsvSink};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Shelf-Crawler: a catalogue harvester for static bookshop sites
///
/// Shelf-Crawler walks the category sidebar of a bookshop, follows each
/// category's paginated listing and writes one CSV file per category,
/// downloading every cover image along the way.
#[derive(Parser, Debug)]
#[command(name = "shelf-crawler")]
#[command(version)]
#[command(about = "A catalogue harvester for static bookshop sites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the root page URL from the configuration
    #[arg(long, value_name = "URL", global = true)]
    root_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a single product page into a one-row CSV
    Product {
        /// Product page URL
        url: String,

        /// Write the CSV here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Export one category listing to its CSV file
    Category {
        /// First listing page of the category
        url: String,

        /// Category name (defaults to the listing page heading)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Crawl every category from the root page (default)
    Crawl {
        /// Only export categories with this name (repeatable)
        #[arg(long = "category", value_name = "NAME")]
        categories: Vec<String>,
    },

    /// Discover and print categories without exporting anything
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_settings(&cli)?;

    match cli.command.unwrap_or(Command::Crawl { categories: vec![] }) {
        Command::Product { url, output } => handle_product(config, &url, output).await,
        Command::Category { url, name } => handle_category(config, &url, name).await,
        Command::Crawl { categories } => handle_crawl(config, config_hash, &categories).await,
        Command::Categories => handle_categories(config).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_crawler=info,warn"),
            1 => EnvFilter::new("shelf_crawler=debug,info"),
            2 => EnvFilter::new("shelf_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file (or defaults) and applies CLI overrides
fn load_settings(cli: &Cli) -> anyhow::Result<(Config, String)> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let loaded = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", loaded.1);
            loaded
        }
        None => (Config::default(), DEFAULT_CONFIG_HASH.to_string()),
    };

    if let Some(root_url) = &cli.root_url {
        config.crawler.root_url = root_url.clone();
    }
    validate(&config).context("Invalid configuration")?;

    Ok((config, hash))
}

/// Handles `product`: one product page to a one-row CSV
async fn handle_product(config: Config, url: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let page_url = Url::parse(url).with_context(|| format!("Invalid product URL: {}", url))?;
    let download_images = config.output.download_images;
    let images_dir = config.output.images_dir.clone();
    let crawler = Crawler::new(config)?;

    let html = crawler.fetcher().fetch_page(page_url.as_str()).await?;
    let mut product = extract_product(&html, &page_url, None)?;

    if download_images {
        let downloader = ImageDownloader::new(crawler.fetcher(), images_dir);
        match downloader.download(&product).await {
            Ok(path) => product.image_local_path = Some(path.display().to_string()),
            Err(e) => tracing::warn!("Image for {} not stored: {}", product.upc, e),
        }
    }

    match output {
        Some(path) => {
            let mut sink = CsvSink::create(&path)?;
            sink.write(&product)?;
            sink.finish()?;
            tracing::info!("Product {} written to {}", product.upc, path.display());
        }
        None => {
            let mut sink = CsvSink::from_writer(std::io::stdout().lock())?;
            sink.write(&product)?;
            sink.finish()?;
        }
    }

    Ok(())
}

/// Handles `category`: one listing to `<csv_dir>/<slug>.csv`
async fn handle_category(config: Config, url: &str, name: Option<String>) -> anyhow::Result<()> {
    let listing_url = Url::parse(url).with_context(|| format!("Invalid category URL: {}", url))?;
    let crawler = Crawler::new(config)?;

    let exporter = crawler.exporter();
    let report = match name {
        Some(name) => exporter.export(&Category::new(name, listing_url)).await?,
        None => exporter.export_untitled(&listing_url).await?,
    };

    println!(
        "✓ {}: {} products written to {} ({} skipped, {} images missing)",
        report.name,
        report.products_written,
        report.csv_path.display(),
        report.product_failures,
        report.image_failures
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String, only: &[String]) -> anyhow::Result<()> {
    tracing::info!("Starting crawl from {}", config.crawler.root_url);
    if !only.is_empty() {
        tracing::info!("Restricted to categories: {}", only.join(", "));
    }

    let crawler = Crawler::new(config)?.with_config_hash(config_hash);

    match crawler.run_filtered(only).await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles `categories`: discovery only
async fn handle_categories(config: Config) -> anyhow::Result<()> {
    let crawler = Crawler::new(config)?;
    let exporter = crawler.exporter();
    let categories = crawler.discover().await?;

    println!("Categories ({}):", categories.len());
    for category in &categories {
        println!("  - {} ({})", category.name, category.listing_url);
        println!("    -> {}", exporter.csv_path(category).display());
    }

    Ok(())
}
