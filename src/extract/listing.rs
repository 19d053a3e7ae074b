//! Category listing page parsing

use super::{css, first_text};
use crate::url::resolve_href;
use scraper::Html;
use url::Url;

/// What one listing page contributes to a category traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// The page these links were read from
    pub url: Url,

    /// Page heading, normally the category name
    pub heading: Option<String>,

    /// Product page links in markup order, resolved to absolute URLs
    pub product_urls: Vec<Url>,

    /// Target of the "next" pagination control, if present
    pub next_url: Option<Url>,
}

/// Parses one category listing page
///
/// Product cards are `article.product_pod`, their link is the `h3 a`. The
/// "next" control is `li.next a`. Relative hrefs resolve against `page_url`.
pub fn parse_listing_page(html: &str, page_url: &Url) -> ListingPage {
    let document = Html::parse_document(html);

    let heading = first_text(document.root_element(), &["div.page-header h1", "h1"]);

    let product_urls = css("article.product_pod h3 a[href]")
        .map(|selector| {
            document
                .select(&selector)
                .filter_map(|link| link.value().attr("href"))
                .filter_map(|href| resolve_href(href, page_url))
                .collect()
        })
        .unwrap_or_default();

    let next_url = css("li.next a[href]").and_then(|selector| {
        document
            .select(&selector)
            .next()
            .and_then(|link| link.value().attr("href"))
            .and_then(|href| resolve_href(href, page_url))
    });

    ListingPage {
        url: page_url.clone(),
        heading,
        product_urls,
        next_url,
    }
}
