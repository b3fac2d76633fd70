use std::time::Duration;

const REQUEST_TIMEOUT_SECONDS: u64 = 15;
const RESOURCE_TIMEOUT_SECONDS: u64 = 30;
const MAX_RESPONSE_BYTES: usize = 50 * 1024 * 1024;

const USER_AGENT: &str = "image_cache/0.1";

/// Tuning knobs for [`crate::client::HttpFetcher`].
///
/// `request_timeout` bounds each read on the connection, `resource_timeout`
/// bounds the whole download from request start to last byte.
/// `max_response_bytes` caps the body size, zero disables the cap.
#[derive(Clone, Debug)]
pub struct FetcherConfig {
    pub(crate) request_timeout: Duration,
    pub(crate) resource_timeout: Duration,
    pub(crate) max_retries: u32,
    pub(crate) max_response_bytes: usize,
    pub(crate) user_agent: String,
    pub(crate) https_only: bool,
}

pub struct FetcherConfigBuilder {
    config: FetcherConfig,
}

impl FetcherConfig {
    pub fn builder() -> FetcherConfigBuilder {
        FetcherConfigBuilder::new()
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        FetcherConfig {
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECONDS),
            resource_timeout: Duration::from_secs(RESOURCE_TIMEOUT_SECONDS),
            max_retries: 0,
            max_response_bytes: MAX_RESPONSE_BYTES,
            user_agent: USER_AGENT.into(),
            https_only: false,
        }
    }
}

impl Default for FetcherConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FetcherConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: FetcherConfig::default(),
        }
    }

    pub fn set_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;

        self
    }

    pub fn set_resource_timeout(mut self, timeout: Duration) -> Self {
        self.config.resource_timeout = timeout;

        self
    }

    pub fn set_max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;

        self
    }

    pub fn set_max_response_bytes(mut self, bytes: usize) -> Self {
        self.config.max_response_bytes = bytes;

        self
    }

    pub fn set_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();

        self
    }

    pub fn set_https_only(mut self, https_only: bool) -> Self {
        self.config.https_only = https_only;

        self
    }

    pub fn build(self) -> FetcherConfig {
        self.config
    }
}
