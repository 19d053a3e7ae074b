use serde::Deserialize;

/// Site root crawled when neither the config file nor the CLI names one
pub const DEFAULT_ROOT_URL: &str = "https://books.toscrape.com/index.html";

/// Main configuration structure for Shelf-Crawler
///
/// Every section and key is optional; a missing file section falls back to
/// the defaults below so the binary runs with no arguments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Page holding the category sidebar
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Maximum listing pages visited per category before traversal stops
    #[serde(rename = "max-listing-pages")]
    pub max_listing_pages: usize,

    /// Product pages fetched concurrently within one category
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,

    /// Minimum time between two request starts (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Extra attempts for 5xx responses and timeouts
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Pause between retry attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            max_listing_pages: 1000,
            max_concurrent_fetches: 1,
            request_delay_ms: 0,
            request_timeout_secs: 30,
            max_retries: 2,
            retry_delay_ms: 500,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ShelfCrawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/shelf-crawler/shelf-crawler".to_string(),
            contact_email: "crawler@shelf-crawler.dev".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving one CSV file per category
    #[serde(rename = "csv-dir")]
    pub csv_dir: String,

    /// Directory receiving `<category>/<upc>.<ext>` image files
    #[serde(rename = "images-dir")]
    pub images_dir: String,

    /// Whether cover images are downloaded at all
    #[serde(rename = "download-images")]
    pub download_images: bool,

    /// Optional path of the markdown run report
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_dir: "output/csv".to_string(),
            images_dir: "output/images".to_string(),
            download_images: true,
            summary_path: None,
        }
    }
}
