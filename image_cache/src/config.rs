const MAX_ENTRIES: usize = 256;
const MAX_DECODED_PIXELS: u64 = 100_000_000;

/// Limits for a single [`crate::ImageCache`] instance.
///
/// `max_entries` caps how many decoded images stay resident, oldest out
/// first. `max_decoded_pixels` rejects images whose decoded size would be
/// absurd for a list thumbnail. Zero disables either limit.
#[derive(Clone, Copy, Debug)]
pub struct CacheConfig {
    pub(crate) max_entries: usize,
    pub(crate) max_decoded_pixels: u64,
}

pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfig {
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::new()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_entries: MAX_ENTRIES,
            max_decoded_pixels: MAX_DECODED_PIXELS,
        }
    }
}

impl Default for CacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: CacheConfig::default(),
        }
    }

    pub fn set_max_entries(mut self, max_entries: usize) -> Self {
        self.config.max_entries = max_entries;

        self
    }

    pub fn set_max_decoded_pixels(mut self, max_decoded_pixels: u64) -> Self {
        self.config.max_decoded_pixels = max_decoded_pixels;

        self
    }

    pub fn build(self) -> CacheConfig {
        self.config
    }
}
