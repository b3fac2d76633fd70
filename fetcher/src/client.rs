use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{ClientBuilder as BaseClientBuilder, header::CONTENT_TYPE};
use reqwest_middleware::{ClientBuilder as RetryableClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::{debug, info};

use crate::{
    config::FetcherConfig,
    errors::FetchError,
    traits::{FetchedBytes, Fetcher},
};

const MIN_SECS_BACKOFF: u64 = 1;
const MAX_SECS_BACKOFF: u64 = 10;

/// Downloads image bytes over HTTP(S).
///
/// Each instance owns its own connection pool, so two caches with different
/// fetcher configs never share sockets or retry policies.
pub struct HttpFetcher {
    client: ClientWithMiddleware,
    max_response_bytes: usize,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_config(FetcherConfig::default())
    }

    pub fn with_config(config: FetcherConfig) -> Self {
        let base_client = BaseClientBuilder::new()
            .gzip(true)
            .http1_ignore_invalid_headers_in_responses(true)
            .read_timeout(config.request_timeout)
            .timeout(config.resource_timeout)
            .user_agent(config.user_agent)
            .https_only(config.https_only)
            .build()
            .expect("Valid base reqwest to be built");

        let retry_strat = ExponentialBackoff::builder()
            .retry_bounds(
                Duration::from_secs(MIN_SECS_BACKOFF),
                Duration::from_secs(MAX_SECS_BACKOFF),
            )
            .build_with_max_retries(config.max_retries);
        let retry_middleware = RetryTransientMiddleware::new_with_policy(retry_strat);

        let client = RetryableClientBuilder::new(base_client)
            .with(retry_middleware)
            .build();

        Self {
            client,
            max_response_bytes: config.max_response_bytes,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedBytes, FetchError> {
        info!("Sending request to {}", url);

        let response = self.client.get(url).send().await?;

        debug!("{response:?}");

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus { status });
        }

        if self.max_response_bytes > 0 {
            if let Some(length) = response.content_length() {
                if length > self.max_response_bytes as u64 {
                    return Err(FetchError::ResponseTooLarge {
                        limit: self.max_response_bytes,
                    });
                }
            }
        }

        let content_type = response.headers().get(CONTENT_TYPE).cloned();

        // Content-Length is advisory, so enforce the cap on the stream too.
        // A cap of zero means no limit.
        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;

            if self.max_response_bytes > 0 && bytes.len() + chunk.len() > self.max_response_bytes {
                return Err(FetchError::ResponseTooLarge {
                    limit: self.max_response_bytes,
                });
            }

            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchedBytes {
            bytes,
            content_type,
        })
    }
}
