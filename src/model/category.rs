use crate::url::slugify;
use url::Url;

/// A site-defined grouping of books with its own paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Name as shown in the navigation sidebar
    pub name: String,

    /// Absolute URL of the first listing page
    pub listing_url: Url,
}

impl Category {
    pub fn new(name: impl Into<String>, listing_url: Url) -> Self {
        Self {
            name: name.into(),
            listing_url,
        }
    }

    /// File-system stem for this category's CSV file and image directory
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}
