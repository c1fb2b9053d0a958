use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::core::clock::{Clock, SystemClock};
use crate::core::error::Result;

/// A cached value and the time it was built.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub built_at_millis: i64,
}

impl<T> CacheEntry<T> {
    pub fn is_fresh(&self, now_millis: i64, ttl_millis: i64) -> bool {
        now_millis - self.built_at_millis < ttl_millis
    }
}

/// Time-bounded memoization keyed by collection identifier.
///
/// Freshness is checked on every read: an entry whose age has reached the TTL
/// is never returned. Builds run outside the lock, so two callers racing on a
/// missing key may both build; the later insert wins. A failed build stores
/// nothing. There is no size bound: one entry per key, removed by
/// [`invalidate`](Self::invalidate) or expiry.
pub struct TtlCache<K, V> {
    name: &'static str,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    ttl_millis: i64,
    clock: Arc<dyn Clock>,
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
    build_count: AtomicUsize,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self::with_clock(name, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        TtlCache {
            name,
            entries: RwLock::new(HashMap::new()),
            ttl_millis: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            clock,
            hit_count: AtomicUsize::new(0),
            miss_count: AtomicUsize::new(0),
            build_count: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_millis.max(0) as u64)
    }

    /// Cached value for `key` if present and unexpired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now_millis();
        let entries = self.entries.read();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(now, self.ttl_millis) => {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            _ => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Return the fresh cached value or run `build` and store its result.
    pub async fn get_or_build<F, Fut>(&self, key: &K, build: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        debug!(cache = self.name, key = ?key, "cache miss, building");
        let value = build().await?;
        self.insert(key.clone(), value.clone());
        Ok(value)
    }

    /// Synchronous form of [`get_or_build`](Self::get_or_build).
    pub fn get_or_build_sync<F>(&self, key: &K, build: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        debug!(cache = self.name, key = ?key, "cache miss, building");
        let value = build()?;
        self.insert(key.clone(), value.clone());
        Ok(value)
    }

    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            built_at_millis: self.clock.now_millis(),
        };
        self.build_count.fetch_add(1, Ordering::Relaxed);
        self.entries.write().insert(key, entry);
    }

    pub fn invalidate(&self, key: &K) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Drop every entry whose age has reached the TTL. Returns how many went.
    pub fn invalidate_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now, self.ttl_millis));
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            name: self.name,
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            build_count: self.build_count.load(Ordering::Relaxed),
            size: self.len(),
            ttl_millis: self.ttl_millis,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub name: &'static str,
    pub hit_count: usize,
    pub miss_count: usize,
    pub build_count: usize,
    pub size: usize,
    pub ttl_millis: i64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

/// Anything the background sweeper can prune.
pub trait Sweep: Send + Sync {
    fn sweep_name(&self) -> &'static str;
    fn sweep_expired(&self) -> usize;
}

impl<K, V> Sweep for TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn sweep_name(&self) -> &'static str {
        self.name
    }

    fn sweep_expired(&self) -> usize {
        self.invalidate_expired()
    }
}
