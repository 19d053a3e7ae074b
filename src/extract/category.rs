//! Category discovery from the site's navigation sidebar

use super::{css, element_text};
use crate::model::Category;
use crate::url::resolve_href;
use crate::DiscoveryError;
use scraper::Html;
use url::Url;

/// Reads the category sidebar of the root page
///
/// The sidebar is `div.side_categories`; its top-level `ul.nav-list > li`
/// holds the catch-all "Books" entry, and the nested `ul` under it lists the
/// real categories. Categories are returned in markup order.
///
/// # Returns
///
/// * `Ok(Vec<Category>)` - Categories in sidebar order (possibly empty)
/// * `Err(DiscoveryError)` - The sidebar or its nested list is missing
pub fn discover_categories(html: &str, root_url: &Url) -> Result<Vec<Category>, DiscoveryError> {
    let document = Html::parse_document(html);
    let missing = || DiscoveryError::MissingNavigation {
        url: root_url.to_string(),
    };

    let sidebar_selector = css("div.side_categories").ok_or_else(missing)?;
    let nested_selector = css("ul.nav-list > li > ul").ok_or_else(missing)?;
    let link_selector = css("a[href]").ok_or_else(missing)?;

    let sidebar = document
        .select(&sidebar_selector)
        .next()
        .ok_or_else(missing)?;
    let nested = sidebar
        .select(&nested_selector)
        .next()
        .ok_or_else(missing)?;

    let mut categories = Vec::new();
    for link in nested.select(&link_selector) {
        let name = element_text(link);
        let Some(href) = link.value().attr("href") else {
            continue;
        };

        match resolve_href(href, root_url) {
            Some(listing_url) if !name.is_empty() => {
                categories.push(Category::new(name, listing_url));
            }
            _ => tracing::debug!("Skipping unusable category link '{}' ({})", name, href),
        }
    }

    Ok(categories)
}
