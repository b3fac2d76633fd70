use std::sync::Arc;

use fetcher::client::HttpFetcher;
use image_cache::ImageCache;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use utils::logger::configure_logger;

const DEMO_URLS: [&str; 3] = [
    "https://httpbin.org/image/png",
    "https://httpbin.org/image/jpeg",
    "https://httpbin.org/image/webp",
];

#[tokio::main]
async fn main() {
    configure_logger();

    let fetcher = Arc::new(HttpFetcher::new());
    let cache = ImageCache::new(fetcher).set_error_hook(|url, error| {
        warn!("Image for {} unavailable: {}", url, error);
    });

    let mut handles: Vec<JoinHandle<()>> = Vec::new();

    // Every URL is requested twice, the duplicate either joins the
    // in-flight download or comes straight from memory.
    for url in DEMO_URLS {
        for _ in 0..2 {
            let cache = cache.clone();

            handles.push(tokio::spawn(async move {
                match cache.get_image(url).await {
                    Some(image) => {
                        info!("{} -> {}x{} pixels", url, image.width(), image.height())
                    }
                    None => info!("{} -> no image", url),
                }
            }));
        }
    }

    for handle in handles {
        let _ = handle.await;
    }

    info!("Cache stats: {:?}", cache.stats());
}
