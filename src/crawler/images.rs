//! Cover image download
//!
//! Images land at `<images_dir>/<category_slug>/<upc>.<ext>`. The path depends
//! only on the product's category and UPC, so downloading the same product
//! again overwrites the same file.

use crate::crawler::PageFetcher;
use crate::model::Product;
use crate::url::{image_extension, slugify};
use crate::ImageFetchError;
use std::path::PathBuf;
use std::sync::Arc;

/// Fetches product images and stores them under a fixed directory
#[derive(Clone)]
pub struct ImageDownloader {
    fetcher: Arc<dyn PageFetcher>,
    images_dir: PathBuf,
}

impl ImageDownloader {
    pub fn new(fetcher: Arc<dyn PageFetcher>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            images_dir: images_dir.into(),
        }
    }

    /// Where `product`'s image is stored
    pub fn image_path(&self, product: &Product) -> PathBuf {
        self.images_dir
            .join(slugify(&product.category))
            .join(format!(
                "{}.{}",
                slugify(&product.upc),
                image_extension(&product.image_url)
            ))
    }

    /// Downloads `product`'s image and returns the local path
    ///
    /// The bytes are written to a `.part` sibling first and renamed into place,
    /// so a failed write never leaves a truncated image at the final path.
    pub async fn download(&self, product: &Product) -> Result<PathBuf, ImageFetchError> {
        if !product.has_image() {
            return Err(ImageFetchError::MissingUrl {
                upc: product.upc.clone(),
            });
        }

        let bytes = self.fetcher.fetch_bytes(&product.image_url).await?;

        let path = self.image_path(product);
        let io_error = |source: std::io::Error| ImageFetchError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let mut partial = path.clone().into_os_string();
        partial.push(".part");
        let partial = PathBuf::from(partial);

        tokio::fs::write(&partial, &bytes).await.map_err(io_error)?;
        tokio::fs::rename(&partial, &path).await.map_err(io_error)?;

        tracing::debug!("Stored image for {} at {}", product.upc, path.display());
        Ok(path)
    }
}
