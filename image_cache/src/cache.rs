use std::{collections::HashMap, io::Cursor, sync::Arc};

use common::{image_cache::CachedImageObject, key::CacheKey};
use fetcher::traits::{FetchedBytes, Fetcher};
use image::{DynamicImage, ImageReader};
use tokio::sync::{Mutex, oneshot};
use tracing::debug;

use crate::{
    config::CacheConfig,
    errors::ImageCacheError,
    memory_cache::MemoryCache,
    stats::{CacheStats, CacheStatsSnapshot},
};

/// Called with the requested URL whenever a download or decode fails.
/// Callers only ever see `None`, this is the place to watch failures.
pub type ErrorHook = Arc<dyn Fn(&str, &ImageCacheError) + Send + Sync>;

type Waiter = oneshot::Sender<Option<CachedImageObject>>;

/// Store and in-flight bookkeeping behind one lock. A key is either stored
/// or pending, never both.
struct CacheState {
    store: MemoryCache,
    pending: HashMap<CacheKey, Vec<Waiter>>,
}

/// URL-keyed cache of decoded images.
///
/// The first request for a URL starts a background download, every request
/// that arrives while it is in flight waits on the same download instead of
/// starting another. Clones share the same store, so the owning application
/// can build one instance and hand it to whoever renders images.
#[derive(Clone)]
pub struct ImageCache {
    state: Arc<Mutex<CacheState>>,
    fetcher: Arc<dyn Fetcher>,
    config: CacheConfig,
    stats: Arc<CacheStats>,
    error_hook: Option<ErrorHook>,
}

impl ImageCache {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_config(fetcher, CacheConfig::default())
    }

    pub fn with_config(fetcher: Arc<dyn Fetcher>, config: CacheConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                store: MemoryCache::new(config.max_entries),
                pending: HashMap::new(),
            })),
            fetcher,
            config,
            stats: Arc::new(CacheStats::default()),
            error_hook: None,
        }
    }

    pub fn set_error_hook(
        mut self,
        hook: impl Fn(&str, &ImageCacheError) + Send + Sync + 'static,
    ) -> Self {
        self.error_hook = Some(Arc::new(hook));

        self
    }

    // missing images are not worth surfacing to the caller, whoever asked
    // keeps their placeholder. make the return type optional
    pub async fn get_image(&self, image_url: &str) -> Option<CachedImageObject> {
        self.stats.record_request();

        let Some(cache_key) = CacheKey::parse(image_url) else {
            self.stats.record_invalid_key();
            debug!("Ignoring unusable image URL {:?}", image_url);
            return None;
        };

        let receiver = {
            let mut state = self.state.lock().await;

            if let Some(image) = state.store.get(&cache_key) {
                self.stats.record_hit();
                debug!("Memory cache hit for {}", cache_key);
                return Some(image);
            }

            let (sender, receiver) = oneshot::channel();

            match state.pending.get_mut(&cache_key) {
                Some(waiters) => {
                    self.stats.record_coalesced();
                    debug!("Joining in-flight download for {}", cache_key);
                    waiters.push(sender);
                }
                None => {
                    self.stats.record_miss();
                    debug!("Memory cache miss, downloading {}", cache_key);
                    state.pending.insert(cache_key.clone(), vec![sender]);
                    self.spawn_fetch(cache_key);
                }
            }

            receiver
        };

        receiver.await.unwrap_or(None)
    }

    /// True when the URL is resident, without touching recency.
    pub async fn contains(&self, image_url: &str) -> bool {
        match CacheKey::parse(image_url) {
            Some(cache_key) => self.state.lock().await.store.contains(&cache_key),
            None => false,
        }
    }

    /// Drops one stored entry. An in-flight download for the URL is left
    /// alone and will repopulate the cache when it lands.
    pub async fn remove(&self, image_url: &str) -> bool {
        match CacheKey::parse(image_url) {
            Some(cache_key) => self.state.lock().await.store.remove(&cache_key),
            None => false,
        }
    }

    /// Drops every stored entry. In-flight downloads are unaffected and
    /// insert their result once they finish.
    pub async fn clear(&self) {
        self.state.lock().await.store.clear();
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.store.is_empty()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    fn spawn_fetch(&self, cache_key: CacheKey) {
        let cache = self.clone();

        tokio::spawn(async move {
            let image = match cache.download_image(cache_key.as_str()).await {
                Ok(image) => Some(image),
                Err(error) => {
                    cache.record_failure(&cache_key, &error);
                    None
                }
            };

            cache.finish_fetch(&cache_key, image).await;
        });
    }

    async fn download_image(&self, url: &str) -> Result<CachedImageObject, ImageCacheError> {
        let FetchedBytes {
            bytes,
            content_type,
        } = self.fetcher.fetch(url).await?;

        let image = self.decode_image(&bytes)?;

        Ok(CachedImageObject::new(image, content_type))
    }

    fn decode_image(&self, bytes: &[u8]) -> Result<DynamicImage, ImageCacheError> {
        if self.config.max_decoded_pixels > 0 {
            let reader = ImageReader::new(Cursor::new(bytes))
                .with_guessed_format()
                .map_err(image::ImageError::IoError)?;
            let (width, height) = reader.into_dimensions()?;
            let pixels = u64::from(width) * u64::from(height);

            if pixels > self.config.max_decoded_pixels {
                return Err(ImageCacheError::DecodeLimit {
                    pixels,
                    limit: self.config.max_decoded_pixels,
                });
            }
        }

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(image::ImageError::IoError)?;

        Ok(reader.decode()?)
    }

    /// Publishes the download result. Store insert and pending removal
    /// happen under one lock so a key is never stored and pending at once,
    /// then every waiter is answered in the order it arrived.
    async fn finish_fetch(&self, cache_key: &CacheKey, image: Option<CachedImageObject>) {
        let waiters = {
            let mut state = self.state.lock().await;

            let waiters = state.pending.remove(cache_key).unwrap_or_default();

            if let Some(image) = &image {
                let evicted = state.store.insert(cache_key.clone(), image.clone());
                self.stats.record_evictions(evicted);
            }

            waiters
        };

        for waiter in waiters {
            let _ = waiter.send(image.clone());
        }
    }

    fn record_failure(&self, cache_key: &CacheKey, error: &ImageCacheError) {
        match error {
            ImageCacheError::Fetch(_) => self.stats.record_fetch_failure(),
            _ => self.stats.record_decode_failure(),
        }

        debug!("Image download for {} failed: {}", cache_key, error);

        if let Some(hook) = &self.error_hook {
            hook(cache_key.as_str(), error);
        }
    }
}
