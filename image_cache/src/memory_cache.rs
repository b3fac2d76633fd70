use std::collections::{BTreeMap, HashMap};

use common::{image_cache::CachedImageObject, key::CacheKey};

struct StoredEntry {
    object: CachedImageObject,
    last_used: u64,
}

/// In-memory store with least-recently-used eviction.
///
/// Recency is tracked through a monotonic tick, `recency` maps tick to key
/// so the oldest entry is always the first one in the tree.
pub(crate) struct MemoryCache {
    entries: HashMap<CacheKey, StoredEntry>,
    recency: BTreeMap<u64, CacheKey>,
    tick: u64,
    max_entries: usize,
}

impl MemoryCache {
    /// `max_entries` of zero means no cap.
    pub(crate) fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            tick: 0,
            max_entries,
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    pub(crate) fn get(&mut self, cache_key: &CacheKey) -> Option<CachedImageObject> {
        let tick = self.next_tick();

        let entry = self.entries.get_mut(cache_key)?;

        self.recency.remove(&entry.last_used);
        self.recency.insert(tick, cache_key.clone());
        entry.last_used = tick;

        Some(entry.object.clone())
    }

    /// Stores `object` under `cache_key` and returns how many older entries
    /// had to go to stay within the cap.
    pub(crate) fn insert(&mut self, cache_key: CacheKey, object: CachedImageObject) -> u64 {
        let tick = self.next_tick();

        let previous = self.entries.insert(
            cache_key.clone(),
            StoredEntry {
                object,
                last_used: tick,
            },
        );

        if let Some(previous) = previous {
            self.recency.remove(&previous.last_used);
        }

        self.recency.insert(tick, cache_key);

        let mut evicted = 0;

        if self.max_entries > 0 {
            while self.entries.len() > self.max_entries {
                match self.recency.pop_first() {
                    Some((_, oldest)) => {
                        self.entries.remove(&oldest);
                        evicted += 1;
                    }
                    None => break,
                }
            }
        }

        evicted
    }

    /// Peek that leaves recency alone.
    pub(crate) fn contains(&self, cache_key: &CacheKey) -> bool {
        self.entries.contains_key(cache_key)
    }

    pub(crate) fn remove(&mut self, cache_key: &CacheKey) -> bool {
        match self.entries.remove(cache_key) {
            Some(entry) => {
                self.recency.remove(&entry.last_used);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
