//! URL and file-name helpers
//!
//! Resolves hrefs found in scraped markup against the page they came from, and
//! derives the deterministic file-system names used for CSV and image output.

use url::Url;

/// Slug used when a category name contains no usable characters
pub const FALLBACK_SLUG: &str = "uncategorized";

/// Extension used when an image URL does not carry a usable one
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

/// Resolves an href to an absolute HTTP(S) URL
///
/// Returns None if the link should be ignored:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel:, data: schemes
/// - hrefs that fail to resolve, or resolve to a non-HTTP(S) scheme
///
/// # Example
///
/// ```
/// use shelf_crawler::url::resolve_href;
/// use url::Url;
///
/// let page = Url::parse("https://books.example.com/catalogue/a-light_1000/index.html").unwrap();
/// let image = resolve_href("../../media/cache/fe/72/cover.jpg", &page).unwrap();
/// assert_eq!(image.as_str(), "https://books.example.com/media/cache/fe/72/cover.jpg");
/// ```
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Turns a category name into a file-system safe stem
///
/// Spaces become underscores, then everything except alphanumerics, `_` and
/// `-` is dropped. An empty result maps to [`FALLBACK_SLUG`].
pub fn slugify(name: &str) -> String {
    let slug: String = name
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Picks the file extension for an image URL
///
/// Uses the last path segment's extension when it is short and alphanumeric,
/// otherwise [`DEFAULT_IMAGE_EXTENSION`].
pub fn image_extension(image_url: &str) -> String {
    let Ok(url) = Url::parse(image_url) else {
        return DEFAULT_IMAGE_EXTENSION.to_string();
    };

    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string())
}
