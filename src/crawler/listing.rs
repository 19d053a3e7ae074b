//! Paginated category traversal
//!
//! A category listing is walked page by page, following the "next" control
//! until it disappears. The traversal is exposed as a lazy stream: a page is
//! only fetched once the consumer has drained the previous page's products.
//!
//! Traversal stops on the first of:
//! - no "next" control on the current page
//! - the "next" control points at a page already visited (cycle)
//! - `max_pages` pages visited (safety cap)

use crate::crawler::PageFetcher;
use crate::extract::{parse_listing_page, ListingPage};
use crate::FetchError;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::collections::HashSet;
use url::Url;

/// Enumerates the product pages of one category
pub struct PaginatedListing<'a> {
    fetcher: &'a dyn PageFetcher,
    max_pages: usize,
}

/// Cursor of a single traversal; never outlives the stream that owns it
struct Traversal {
    next: Option<Url>,
    visited: HashSet<Url>,
    seen_products: HashSet<Url>,
}

impl Traversal {
    fn new(start: Url) -> Self {
        Self {
            next: Some(start),
            visited: HashSet::new(),
            seen_products: HashSet::new(),
        }
    }
}

impl<'a> PaginatedListing<'a> {
    /// Creates a listing walker; `max_pages` below 1 is treated as 1
    pub fn new(fetcher: &'a dyn PageFetcher, max_pages: usize) -> Self {
        Self {
            fetcher,
            max_pages: max_pages.max(1),
        }
    }

    /// Streams listing pages starting at `category_url`
    ///
    /// Each call starts a fresh traversal, so re-invoking with the same URL
    /// reproduces the same sequence for an unchanged site. Product URLs already
    /// seen earlier in the traversal are removed from later pages.
    ///
    /// The stream ends after yielding the first `FetchError`.
    pub fn pages(&self, category_url: &Url) -> BoxStream<'a, Result<ListingPage, FetchError>> {
        let fetcher = self.fetcher;
        let max_pages = self.max_pages;

        stream::try_unfold(Traversal::new(category_url.clone()), move |state| {
            advance(fetcher, max_pages, state)
        })
        .boxed()
    }

    /// Streams the product page URLs of a category in traversal order
    pub fn product_urls(&self, category_url: &Url) -> BoxStream<'a, Result<Url, FetchError>> {
        flatten_product_urls(self.pages(category_url))
    }

    /// Collects every product page URL of a category
    pub async fn collect_product_urls(&self, category_url: &Url) -> Result<Vec<Url>, FetchError> {
        self.product_urls(category_url).try_collect().await
    }
}

/// Turns a stream of listing pages into the stream of their product URLs
pub fn flatten_product_urls<'a>(
    pages: BoxStream<'a, Result<ListingPage, FetchError>>,
) -> BoxStream<'a, Result<Url, FetchError>> {
    pages
        .map_ok(|page| stream::iter(page.product_urls.into_iter().map(Ok::<Url, FetchError>)))
        .try_flatten()
        .boxed()
}

/// Fetches the traversal's next page and moves the cursor past it
async fn advance(
    fetcher: &dyn PageFetcher,
    max_pages: usize,
    mut state: Traversal,
) -> Result<Option<(ListingPage, Traversal)>, FetchError> {
    let Some(url) = state.next.take() else {
        return Ok(None);
    };

    let html = fetcher.fetch_page(url.as_str()).await?;
    state.visited.insert(url.clone());

    let mut page = parse_listing_page(&html, &url);
    page.product_urls
        .retain(|product| state.seen_products.insert(product.clone()));

    tracing::debug!(
        "Listing page {} ({}): {} products",
        state.visited.len(),
        url,
        page.product_urls.len()
    );

    state.next = match page.next_url.clone() {
        Some(next) if state.visited.contains(&next) => {
            tracing::warn!("Pagination cycle: {} links back to {}, stopping", url, next);
            None
        }
        Some(next) if state.visited.len() >= max_pages => {
            tracing::warn!(
                "Reached the {}-page listing cap before {}, stopping",
                max_pages,
                next
            );
            None
        }
        next => next,
    };

    Ok(Some((page, state)))
}
