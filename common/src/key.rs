use std::fmt;

use reqwest::Url;

/// Normalized URL addressing a fetchable image resource.
///
/// Only absolute http/https URLs qualify. Anything else (empty strings,
/// relative references, other schemes) is rejected up front so the cache
/// never issues a fetch that cannot succeed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }

        let url = Url::parse(raw).ok()?;

        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        // Url::to_string carries the normalization: lowercased scheme and
        // host, default ports dropped, an explicit "/" path.
        Some(Self(url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
