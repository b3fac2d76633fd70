use fetcher::errors::FetchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageCacheError {
    #[error("Image download failed")]
    Fetch(#[from] FetchError),
    #[error("Image decode failed")]
    Decode(#[from] image::ImageError),
    #[error("Image too large to decode ({pixels} pixels, limit {limit})")]
    DecodeLimit { pixels: u64, limit: u64 },
}
