//! Process-local result cache.
//!
//! Values of any `Clone + Send + Sync` type can share one cache; each entry
//! carries its own TTL and the whole map is bounded with LRU eviction.

use lru::LruCache;
use parking_lot::Mutex;
use std::any::Any;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

type Value = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
pub struct ResultCache {
    entries: Arc<Mutex<LruCache<String, CacheEntry>>>,
}

struct CacheEntry {
    value: Value,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }
}

impl ResultCache {
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Returns a clone of the live value stored under `key`.
    ///
    /// Expired entries and entries of a different type are misses.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut entries = self.entries.lock();
        if entries.peek(key)?.is_expired(Instant::now()) {
            entries.pop(key);
            return None;
        }
        entries.get(key)?.value.downcast_ref::<T>().cloned()
    }

    pub fn put<T>(&self, key: impl Into<String>, value: T, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        let key = key.into();
        let entry = CacheEntry {
            value: Arc::new(value),
            inserted_at: Instant::now(),
            ttl,
        };

        let mut entries = self.entries.lock();
        // expired entries go before the least recently used live one
        if entries.len() == entries.cap().get() && !entries.contains(&key) {
            prune_expired(&mut entries, Instant::now());
        }
        entries.put(key, entry);
    }

    /// Live entry count. Sweeps expired entries first.
    pub fn len(&self) -> usize {
        let mut entries = self.entries.lock();
        prune_expired(&mut entries, Instant::now());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn prune_expired(entries: &mut LruCache<String, CacheEntry>, now: Instant) {
    let expired: Vec<String> = entries
        .iter()
        .filter(|(_, entry)| entry.is_expired(now))
        .map(|(key, _)| key.clone())
        .collect();
    for key in expired {
        entries.pop(&key);
    }
}
