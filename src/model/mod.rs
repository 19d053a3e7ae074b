//! Domain records produced by the crawl
//!
//! - `Product`: one book, written as one CSV row
//! - `StarRating`: the 1-5 review scale
//! - `Category`: a named listing that scopes one export

mod category;
mod product;

pub use category::Category;
pub use product::{Product, StarRating, CSV_COLUMNS};
