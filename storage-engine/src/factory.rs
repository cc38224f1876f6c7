use crate::clock::{Clock, SystemClock};
use crate::moka_cache::MokaCache;
use crate::ttl_cache::TtlCache;
use logitrack::domain::CacheConfig;
use logitrack::ports::{CacheStore, StorageFactory};
use shared::config::CacheBackend;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tracing::info;

/// Builds the configured cache backend
#[derive(Debug, Clone)]
pub struct CacheFactory {
    clock: Arc<dyn Clock>,
}

impl CacheFactory {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Clock handed to `TtlCache`; moka keeps its own time
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for CacheFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> StorageFactory<K, V> for CacheFactory
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn create_from_config(&self, config: &CacheConfig) -> Arc<dyn CacheStore<K, V>> {
        info!(
            "Creating {:?} cache '{}' (default ttl {:?})",
            config.backend, config.name, config.default_ttl
        );
        match config.backend {
            CacheBackend::Ttl => Arc::new(TtlCache::with_clock(
                config.name.clone(),
                self.clock.clone(),
            )),
            CacheBackend::Moka => Arc::new(MokaCache::new(&config.name, config.max_entries)),
        }
    }
}
