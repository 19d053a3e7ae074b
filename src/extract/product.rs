//! Product page extraction
//!
//! Reads fixed locations of a product page:
//!
//! | Field | Location | When absent |
//! |-------|----------|-------------|
//! | title | `div.product_main h1`, else first `h1` | ParseError |
//! | upc | info table row `UPC` | ParseError |
//! | price incl. tax | info table row `Price (incl. tax)` | ParseError |
//! | price excl. tax | info table row `Price (excl. tax)` | 0.00 |
//! | quantity | `p.instock.availability`, else row `Availability` | 0 |
//! | description | `p` right after `#product_description` | empty |
//! | category | caller's label, else third breadcrumb entry | empty |
//! | rating | `p.star-rating` class token `One`..`Five` | None |
//! | image | `div.item.active img`, else `#product_gallery img` | empty |

use super::{css, element_text, first_text};
use crate::model::{Product, StarRating};
use crate::url::resolve_href;
use crate::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use std::str::FromStr;
use url::Url;

/// Count inside stock text, e.g. `In stock (22 available)`
static STOCK_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(\d+)\s+available").ok());

/// Parses a product page into a `Product`
///
/// `category` is the label of the category being exported; when given it wins
/// over the page's own breadcrumb so every row of one export carries the same
/// label.
///
/// # Returns
///
/// * `Ok(Product)` - All mandatory fields present; optional fields defaulted
/// * `Err(ParseError)` - UPC, title or price including tax is missing or
///   unreadable, or the two prices contradict each other
///
/// # Example
///
/// ```
/// use shelf_crawler::extract::extract_product;
/// use url::Url;
///
/// let html = r#"<div class="product_main"><h1>A Light in the Attic</h1></div>
///     <table class="table table-striped">
///       <tr><th>UPC</th><td>a897fe39b1053632</td></tr>
///       <tr><th>Price (incl. tax)</th><td>£51.77</td></tr>
///     </table>"#;
/// let url = Url::parse("https://books.example.com/catalogue/a-light-in-the-attic_1000/index.html").unwrap();
/// let product = extract_product(html, &url, Some("Poetry")).unwrap();
/// assert_eq!(product.upc, "a897fe39b1053632");
/// assert_eq!(product.category, "Poetry");
/// ```
pub fn extract_product(
    html: &str,
    page_url: &Url,
    category: Option<&str>,
) -> Result<Product, ParseError> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let url = page_url.as_str();

    let info = info_table(root);

    let title = first_text(root, &["div.product_main h1", "h1"])
        .ok_or_else(|| missing_field(url, "book_title"))?;

    let upc = info
        .get("UPC")
        .filter(|upc| !upc.is_empty())
        .cloned()
        .ok_or_else(|| missing_field(url, "upc"))?;

    let raw_including = info
        .get("Price (incl. tax)")
        .ok_or_else(|| missing_field(url, "price_including_tax"))?;
    let price_including_tax = parse_price(raw_including).ok_or_else(|| ParseError::InvalidField {
        url: url.to_string(),
        field: "price_including_tax",
        value: raw_including.clone(),
    })?;

    let price_excluding_tax = match info.get("Price (excl. tax)").map(|raw| (raw, parse_price(raw))) {
        Some((_, Some(price))) => price,
        Some((raw, None)) => {
            tracing::debug!("Unreadable price excl. tax '{}' on {}, using 0", raw, url);
            Decimal::new(0, 2)
        }
        None => Decimal::new(0, 2),
    };

    if price_excluding_tax > price_including_tax {
        return Err(ParseError::InconsistentPrices {
            url: url.to_string(),
            including: price_including_tax.to_string(),
            excluding: price_excluding_tax.to_string(),
        });
    }

    let quantity_available = first_text(root, &["p.instock.availability", "p.availability"])
        .and_then(|text| parse_quantity(&text))
        .or_else(|| info.get("Availability").and_then(|text| parse_quantity(text)))
        .unwrap_or(0);

    let description = first_text(root, &["#product_description + p"]).unwrap_or_default();

    let category = match category {
        Some(label) => label.to_string(),
        None => breadcrumb_category(root).unwrap_or_default(),
    };

    let review_rating = star_rating(root);

    let image_url = image_url(root, page_url)
        .map(|image| image.to_string())
        .unwrap_or_default();

    Ok(Product {
        product_page_url: url.to_string(),
        upc,
        title,
        price_including_tax,
        price_excluding_tax,
        quantity_available,
        description,
        category,
        review_rating,
        image_url,
        image_local_path: None,
    })
}

/// Parses a currency string such as `£51.77` into a two-digit decimal
///
/// Everything except digits and the decimal point is stripped first.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if digits.is_empty() {
        return None;
    }

    let mut price = Decimal::from_str(&digits).ok()?.round_dp(2);
    price.rescale(2);
    Some(price)
}

/// Extracts the count from stock text such as `In stock (22 available)`
pub fn parse_quantity(text: &str) -> Option<u32> {
    STOCK_PATTERN
        .as_ref()?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|count| count.as_str().parse().ok())
}

fn missing_field(url: &str, field: &'static str) -> ParseError {
    ParseError::MissingField {
        url: url.to_string(),
        field,
    }
}

/// Reads the product information table into header → value pairs
fn info_table(root: ElementRef<'_>) -> HashMap<String, String> {
    let mut rows = HashMap::new();

    let (Some(row_selector), Some(th), Some(td)) =
        (css("table.table-striped tr"), css("th"), css("td"))
    else {
        return rows;
    };

    for row in root.select(&row_selector) {
        let header = row.select(&th).next().map(element_text);
        let value = row.select(&td).next().map(element_text);
        if let (Some(header), Some(value)) = (header, value) {
            rows.entry(header).or_insert(value);
        }
    }

    rows
}

/// Category name from `Home > Books > Category > Title` breadcrumbs
fn breadcrumb_category(root: ElementRef<'_>) -> Option<String> {
    let items = css("ul.breadcrumb li")?;
    let anchor = css("a")?;

    root.select(&items)
        .nth(2)
        .and_then(|item| item.select(&anchor).next())
        .map(element_text)
        .filter(|name| !name.is_empty())
}

/// Rating of the main product, ignoring ratings of recommended products
fn star_rating(root: ElementRef<'_>) -> Option<StarRating> {
    ["div.product_main p.star-rating", "p.star-rating"]
        .iter()
        .find_map(|selector| {
            let selector = css(selector)?;
            root.select(&selector).next()
        })
        .and_then(|element| {
            element
                .value()
                .classes()
                .find_map(StarRating::from_class_token)
        })
}

fn image_url(root: ElementRef<'_>, page_url: &Url) -> Option<Url> {
    ["div.item.active img", "#product_gallery img"]
        .iter()
        .find_map(|selector| {
            let selector = css(selector)?;
            root.select(&selector)
                .find_map(|img| img.value().attr("src"))
        })
        .and_then(|src| resolve_href(src, page_url))
}
