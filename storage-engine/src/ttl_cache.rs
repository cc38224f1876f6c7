use crate::clock::{Clock, SystemClock};
use async_trait::async_trait;
use dashmap::DashMap;
use logitrack::ports::CacheStore;
use shared::Result;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) > self.ttl
    }
}

/// Sharded in-memory table with lazy per-entry expiry.
///
/// Expired entries stay in the table until a `get` observes them or
/// `purge_expired` sweeps them.
pub struct TtlCache<K, V>
where
    K: Hash + Eq,
{
    name: String,
    entries: DashMap<K, Entry<V>>,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock(name, Arc::new(SystemClock))
    }

    pub fn with_clock(name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            entries: DashMap::new(),
            clock,
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .iter()
            .filter(|entry| !entry.value().is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            debug!("Purged {} expired entries from cache {}", purged, self.name);
        }
        purged
    }
}

#[async_trait]
impl<K, V> CacheStore<K, V> for TtlCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        let now = self.clock.now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Ok(Some(entry.value.clone()));
            }
        }

        // the read guard is released above; a concurrent set may have
        // replaced the entry, so only drop it if it is still expired
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
        {
            debug!("Dropped expired key {:?} from cache {}", key, self.name);
        }
        Ok(None)
    }

    async fn set(&self, key: K, val: V, ttl: Duration) -> Result<()> {
        let entry = Entry {
            value: val,
            inserted_at: self.clock.now(),
            ttl,
        };
        self.entries.insert(key, entry);
        Ok(())
    }

    async fn remove(&self, key: &K) -> Result<bool> {
        let now = self.clock.now();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, entry)| !entry.is_expired(now)))
    }
}

impl<K, V> Debug for TtlCache<K, V>
where
    K: Hash + Eq,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("name", &self.name)
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const TTL: Duration = Duration::from_secs(300);
    const EPSILON: Duration = Duration::from_millis(1);

    fn cache() -> (Arc<ManualClock>, TtlCache<&'static str, String>) {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::with_clock("test", clock.clone());
        (clock, cache)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (_, cache) = cache();
        assert_eq!(cache.get(&"inventory_all").await.unwrap(), None);

        cache.set("inventory_all", "v1".into(), TTL).await.unwrap();
        assert_eq!(cache.get(&"inventory_all").await.unwrap().as_deref(), Some("v1"));

        cache.set("inventory_all", "v2".into(), TTL).await.unwrap();
        assert_eq!(cache.get(&"inventory_all").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let (clock, cache) = cache();
        cache.set("inventory_all", "snapshot".into(), TTL).await.unwrap();

        clock.advance(TTL - EPSILON);
        assert!(cache.get(&"inventory_all").await.unwrap().is_some());

        clock.advance(EPSILON * 2);
        assert!(cache.get(&"inventory_all").await.unwrap().is_none());
        // observed expiry removes the entry
        assert_eq!(cache.entries.len(), 0);
    }

    #[tokio::test]
    async fn test_set_restarts_countdown() {
        let (clock, cache) = cache();
        cache.set("k", "old".into(), TTL).await.unwrap();

        clock.advance(Duration::from_secs(200));
        cache.set("k", "new".into(), TTL).await.unwrap();

        clock.advance(Duration::from_secs(200));
        assert_eq!(cache.get(&"k").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (clock, cache) = cache();
        assert!(!cache.remove(&"missing").await.unwrap());

        cache.set("k", "v".into(), TTL).await.unwrap();
        assert!(cache.remove(&"k").await.unwrap());
        assert!(!cache.remove(&"k").await.unwrap());
        assert!(cache.get(&"k").await.unwrap().is_none());

        // an expired entry counts as absent
        cache.set("k", "v".into(), TTL).await.unwrap();
        clock.advance(TTL + EPSILON);
        assert!(!cache.remove(&"k").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (clock, cache) = cache();
        cache.set("short", "a".into(), Duration::from_secs(10)).await.unwrap();
        cache.set("long", "b".into(), TTL).await.unwrap();

        clock.advance(Duration::from_secs(11));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.purge_expired(), 0);
        assert!(cache.get(&"long").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_access() {
        let cache = Arc::new(TtlCache::<u32, u32>::new("concurrent"));
        let mut handles = Vec::new();
        for worker in 0..8u32 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..100u32 {
                    cache.set(i % 10, worker, TTL).await.unwrap();
                    let _ = cache.get(&(i % 10)).await.unwrap();
                    if i % 7 == 0 {
                        cache.remove(&(i % 10)).await.unwrap();
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert!(cache.len() <= 10);
    }
}
