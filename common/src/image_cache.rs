use std::sync::Arc;

use image::DynamicImage;
use reqwest::header::HeaderValue;

/// A decoded image as held by the cache. Cloning is cheap, the pixel data
/// is shared behind the [`Arc`].
#[derive(Clone, Debug)]
pub struct CachedImageObject {
    pub mime_type: Option<HeaderValue>,
    pub image: Arc<DynamicImage>,
}

impl CachedImageObject {
    pub fn new(image: DynamicImage, mime_type: Option<HeaderValue>) -> Self {
        Self {
            mime_type,
            image: Arc::new(image),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}
