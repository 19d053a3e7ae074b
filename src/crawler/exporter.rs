//! Single-category export
//!
//! Drives one category through the pipeline:
//! listing → product page → extraction → image → CSV row.
//!
//! Failure policy:
//! - product page fetch or parse failure: logged, counted, product skipped
//! - image failure: logged, counted, row written without a local path
//! - listing page fetch failure or CSV write failure: export stops with an
//!   `ExportError`; rows already written stay in the file

use crate::config::Config;
use crate::crawler::listing::flatten_product_urls;
use crate::crawler::{ImageDownloader, PaginatedListing, PageFetcher};
use crate::extract::{extract_product, ListingPage};
use crate::model::{Category, Product};
use crate::output::{CategoryReport, CsvSink};
use crate::{ExportError, FetchError, ParseError};
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Why a single product was skipped
#[derive(Debug, Error)]
pub enum ProductError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Name given to a category exported without a known name
const UNTITLED_CATEGORY: &str = "category";

/// A product ready to be written, plus whether its image was stored
struct ScrapedProduct {
    product: Product,
    image_failed: bool,
}

enum Outcome {
    Product(Result<ScrapedProduct, ProductError>),
    Listing(FetchError),
}

/// Exports categories to `<csv_dir>/<category_slug>.csv`
pub struct CategoryExporter {
    fetcher: Arc<dyn PageFetcher>,
    images: Option<ImageDownloader>,
    csv_dir: PathBuf,
    max_listing_pages: usize,
    concurrency: usize,
}

impl CategoryExporter {
    /// Creates an exporter with output locations and limits from `config`
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Self {
        let images = config
            .output
            .download_images
            .then(|| ImageDownloader::new(Arc::clone(&fetcher), &config.output.images_dir));

        Self {
            fetcher,
            images,
            csv_dir: PathBuf::from(&config.output.csv_dir),
            max_listing_pages: config.crawler.max_listing_pages,
            concurrency: config.crawler.max_concurrent_fetches.max(1),
        }
    }

    /// CSV file written for `category`
    pub fn csv_path(&self, category: &Category) -> PathBuf {
        self.csv_dir.join(format!("{}.csv", category.slug()))
    }

    /// Exports every product of `category` to its CSV file
    ///
    /// The file is truncated and its header written before the first listing
    /// page is fetched. Up to `max_concurrent_fetches` product pages are in
    /// flight at once; rows are still written in listing order.
    ///
    /// # Returns
    ///
    /// * `Ok(CategoryReport)` - Listing fully traversed; counts of written,
    ///   skipped and image-less products
    /// * `Err(ExportError)` - Listing or CSV failure; the file holds the rows
    ///   written before it and the error carries the partial report
    pub async fn export(&self, category: &Category) -> Result<CategoryReport, ExportError> {
        let listing = PaginatedListing::new(self.fetcher.as_ref(), self.max_listing_pages);
        self.export_pages(category, listing.pages(&category.listing_url))
            .await
    }

    /// Exports the listing starting at `listing_url`, named after its heading
    ///
    /// The first listing page is fetched once and reused for the export. A
    /// page without a heading, or an unreachable first page, falls back to
    /// the name `category`.
    pub async fn export_untitled(&self, listing_url: &Url) -> Result<CategoryReport, ExportError> {
        let listing = PaginatedListing::new(self.fetcher.as_ref(), self.max_listing_pages);
        let mut pages = listing.pages(listing_url);

        match pages.next().await {
            Some(Ok(first)) => {
                let name = first
                    .heading
                    .clone()
                    .unwrap_or_else(|| UNTITLED_CATEGORY.to_string());
                let category = Category::new(name, listing_url.clone());
                let pages = stream::once(future::ready(Ok(first))).chain(pages).boxed();
                self.export_pages(&category, pages).await
            }
            Some(Err(e)) => {
                let category = Category::new(UNTITLED_CATEGORY, listing_url.clone());
                self.export_pages(&category, stream::once(future::ready(Err(e))).boxed())
                    .await
            }
            None => {
                let category = Category::new(UNTITLED_CATEGORY, listing_url.clone());
                self.export_pages(&category, stream::empty().boxed()).await
            }
        }
    }

    async fn export_pages<'s>(
        &'s self,
        category: &'s Category,
        pages: BoxStream<'s, Result<ListingPage, FetchError>>,
    ) -> Result<CategoryReport, ExportError> {
        let csv_path = self.csv_path(category);

        tokio::fs::create_dir_all(&self.csv_dir)
            .await
            .map_err(|source| ExportError::Io {
                category: category.name.clone(),
                source,
            })?;

        let mut report = CategoryReport::new(&category.name, csv_path.clone());

        let mut sink = match CsvSink::create(&csv_path) {
            Ok(sink) => sink,
            Err(source) => {
                return Err(ExportError::Csv {
                    report: Box::new(report),
                    source,
                })
            }
        };

        let outcomes = flatten_product_urls(pages)
            .map(move |item| async move {
                match item {
                    Ok(url) => Outcome::Product(self.scrape_product(url, category).await),
                    Err(e) => Outcome::Listing(e),
                }
            })
            .buffered(self.concurrency);
        let mut outcomes = std::pin::pin!(outcomes);

        while let Some(outcome) = outcomes.next().await {
            match outcome {
                Outcome::Product(Ok(scraped)) => {
                    if scraped.image_failed {
                        report.image_failures += 1;
                    }
                    if let Err(source) = sink.write(&scraped.product) {
                        return Err(ExportError::Csv {
                            report: Box::new(report),
                            source,
                        });
                    }
                    report.products_written += 1;
                }
                Outcome::Product(Err(e)) => {
                    tracing::warn!("Skipping product in '{}': {}", category.name, e);
                    report.product_failures += 1;
                }
                Outcome::Listing(source) => {
                    if let Err(e) = sink.finish() {
                        tracing::warn!("Failed to flush {}: {}", csv_path.display(), e);
                    }
                    return Err(ExportError::Listing {
                        report: Box::new(report),
                        source,
                    });
                }
            }
        }

        if let Err(source) = sink.finish() {
            return Err(ExportError::Csv {
                report: Box::new(report),
                source,
            });
        }

        tracing::info!(
            "Exported '{}': {} products written, {} skipped, {} images missing -> {}",
            category.name,
            report.products_written,
            report.product_failures,
            report.image_failures,
            csv_path.display()
        );

        Ok(report)
    }

    /// Fetches, extracts and (optionally) downloads the image of one product
    async fn scrape_product(
        &self,
        url: Url,
        category: &Category,
    ) -> Result<ScrapedProduct, ProductError> {
        let html = self.fetcher.fetch_page(url.as_str()).await?;
        let mut product = extract_product(&html, &url, Some(&category.name))?;

        let mut image_failed = false;
        if let Some(images) = &self.images {
            match images.download(&product).await {
                Ok(path) => product.image_local_path = Some(path.display().to_string()),
                Err(e) => {
                    tracing::warn!("Image for {} not stored: {}", product.upc, e);
                    image_failed = true;
                }
            }
        }

        Ok(ScrapedProduct {
            product,
            image_failed,
        })
    }
}
