use async_trait::async_trait;
use reqwest::header::HeaderValue;

use crate::errors::FetchError;

/// Raw response body for a single URL, plus the Content-Type the server
/// reported, if any.
#[derive(Clone, Debug)]
pub struct FetchedBytes {
    pub bytes: Vec<u8>,
    pub content_type: Option<HeaderValue>,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedBytes, FetchError>;
}
