//! HTML extraction for the bookshop's page types
//!
//! Every function here is pure: it takes page markup plus the URL the markup
//! was served from, and returns structured data. Network access lives in
//! `crate::crawler`.
//!
//! - `product`: a product page → `Product`
//! - `category`: the root page's sidebar → ordered `Category` list
//! - `listing`: one category listing page → product links + next page link

mod category;
mod listing;
mod product;

pub use category::discover_categories;
pub use listing::{parse_listing_page, ListingPage};
pub use product::{extract_product, parse_price, parse_quantity};

use scraper::{ElementRef, Selector};

/// Parses a selector written in this crate; all of them are valid CSS
fn css(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}

/// Collects an element's text with runs of whitespace collapsed to one space
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first element matching any of `selectors`, tried in order
fn first_text<'a>(root: ElementRef<'a>, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        let selector = css(selector)?;
        root.select(&selector)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
    })
}
