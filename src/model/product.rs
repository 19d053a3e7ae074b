//! Product records extracted from product pages
//!
//! A `Product` is created once per product page, optionally enriched with the
//! local path of its downloaded image, and then written as one CSV row.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// CSV header, in column order
pub const CSV_COLUMNS: [&str; 11] = [
    "product_page_url",
    "upc",
    "book_title",
    "price_including_tax",
    "price_excluding_tax",
    "quantity_available",
    "product_description",
    "category",
    "review_rating",
    "image_url",
    "image_local_path",
];

/// One book as listed on its product page
///
/// Field order is the CSV column order; serde renames give the column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Absolute URL of the product page
    pub product_page_url: String,

    /// Universal Product Code, unique across the catalogue
    pub upc: String,

    #[serde(rename = "book_title")]
    pub title: String,

    #[serde(with = "rust_decimal::serde::str")]
    pub price_including_tax: Decimal,

    #[serde(with = "rust_decimal::serde::str")]
    pub price_excluding_tax: Decimal,

    pub quantity_available: u32,

    #[serde(rename = "product_description")]
    pub description: String,

    pub category: String,

    /// Absent when the page carries no recognizable star rating
    pub review_rating: Option<StarRating>,

    /// Absolute URL of the cover image, empty when the page has none
    pub image_url: String,

    /// Set only after the image was stored locally
    pub image_local_path: Option<String>,
}

impl Product {
    /// Returns true if the product links to a cover image
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

/// Review rating on a one to five star scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StarRating {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl StarRating {
    /// Parses the class token the site uses for ratings (`One` .. `Five`)
    pub fn from_class_token(token: &str) -> Option<Self> {
        match token {
            "One" => Some(Self::One),
            "Two" => Some(Self::Two),
            "Three" => Some(Self::Three),
            "Four" => Some(Self::Four),
            "Five" => Some(Self::Five),
            _ => None,
        }
    }

    /// Number of stars, always in 1..=5
    pub fn stars(&self) -> u8 {
        *self as u8
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.stars()
    }
}

impl TryFrom<u8> for StarRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            5 => Ok(Self::Five),
            other => Err(format!("review rating must be between 1 and 5, got {}", other)),
        }
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stars())
    }
}
