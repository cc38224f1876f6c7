use crate::domain::{
    CacheKey, CachedSnapshot, InventoryItem, ItemId, Order, OrderId, OrderSummary, OrderView,
};
use crate::ports::{CacheStore, InventoryStore};
use shared::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(5 * 60);

/// Cache-aside repository over an [`InventoryStore`].
///
/// Full-collection reads of inventory items and order summaries are served
/// from the shared cache when a snapshot is present. Every successful write
/// to a collection removes that collection's snapshot before returning.
/// Single-entity reads always go to the store.
#[derive(Clone)]
pub struct InventoryRepository {
    store: Arc<dyn InventoryStore>,
    cache: Arc<dyn CacheStore<CacheKey, CachedSnapshot>>,
    snapshot_ttl: Duration,
}

impl InventoryRepository {
    pub fn new(
        store: Arc<dyn InventoryStore>,
        cache: Arc<dyn CacheStore<CacheKey, CachedSnapshot>>,
        snapshot_ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            snapshot_ttl,
        }
    }

    // === Inventory ===

    pub async fn get_all_inventory(&self) -> Result<Arc<Vec<InventoryItem>>> {
        if let Some(CachedSnapshot::Inventory(items)) = self.cached(CacheKey::InventoryAll).await {
            debug!("cache hit: {} ({} items)", CacheKey::InventoryAll, items.len());
            return Ok(items);
        }

        debug!("cache miss: {}", CacheKey::InventoryAll);
        let items = Arc::new(self.store.get_all().await?);
        self.populate(
            CacheKey::InventoryAll,
            CachedSnapshot::Inventory(items.clone()),
        )
        .await;
        Ok(items)
    }

    pub async fn get_inventory_by_id(&self, id: ItemId) -> Result<Option<InventoryItem>> {
        self.store.get_by_id(id).await
    }

    pub async fn inventory_exists(&self, id: ItemId) -> Result<bool> {
        self.store.exists(id).await
    }

    pub async fn add_inventory(&self, item: InventoryItem) -> Result<InventoryItem> {
        item.validate()?;

        if self.store.exists(item.id).await? {
            return Err(Error::conflict(format!(
                "an item with id {} already exists",
                item.id
            )));
        }

        let added = self.store.add(item).await?;
        info!("inventory item {} added", added.id);
        self.invalidate(CacheKey::InventoryAll).await;
        Ok(added)
    }

    pub async fn update_inventory(&self, item: InventoryItem) -> Result<InventoryItem> {
        item.validate()?;

        let updated = self.store.update(item).await?;
        info!("inventory item {} updated", updated.id);
        self.invalidate(CacheKey::InventoryAll).await;
        Ok(updated)
    }

    pub async fn delete_inventory(&self, id: ItemId) -> Result<bool> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            info!("inventory item {} deleted", id);
            self.invalidate(CacheKey::InventoryAll).await;
        }
        Ok(deleted)
    }

    // === Orders ===

    pub async fn get_order_by_id(&self, id: OrderId) -> Result<Option<OrderView>> {
        self.store.get_order_by_id(id).await
    }

    pub async fn get_all_orders(&self) -> Result<Vec<OrderView>> {
        self.store.get_all_orders().await
    }

    pub async fn add_order(&self, order: Order) -> Result<Order> {
        order.validate()?;

        let added = self.store.add_order(order).await?;
        info!(
            "order {} added with {} line(s)",
            added.order_id,
            added.lines.len()
        );
        self.invalidate(CacheKey::OrderSummariesAll).await;
        Ok(added)
    }

    pub async fn delete_order(&self, id: OrderId) -> Result<bool> {
        let deleted = self.store.delete_order(id).await?;
        if deleted {
            info!("order {} deleted", id);
            self.invalidate(CacheKey::OrderSummariesAll).await;
        }
        Ok(deleted)
    }

    // === Order summaries ===

    pub async fn get_all_order_summaries(&self) -> Result<Arc<Vec<OrderSummary>>> {
        if let Some(CachedSnapshot::OrderSummaries(summaries)) =
            self.cached(CacheKey::OrderSummariesAll).await
        {
            debug!(
                "cache hit: {} ({} summaries)",
                CacheKey::OrderSummariesAll,
                summaries.len()
            );
            return Ok(summaries);
        }

        debug!("cache miss: {}", CacheKey::OrderSummariesAll);
        let summaries = Arc::new(self.store.get_all_order_summaries().await?);
        self.populate(
            CacheKey::OrderSummariesAll,
            CachedSnapshot::OrderSummaries(summaries.clone()),
        )
        .await;
        Ok(summaries)
    }

    /// No per-order cache key exists; this is always a fresh store read.
    pub async fn get_order_summary(&self, id: OrderId) -> Result<Option<OrderSummary>> {
        self.store.get_order_summary(id).await
    }

    // === Cache plumbing ===
    // Cache failures are logged and swallowed: a broken cache degrades to store reads.

    async fn cached(&self, key: CacheKey) -> Option<CachedSnapshot> {
        match self.cache.get(&key).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("cache read for {} failed, falling back to store: {}", key, e);
                None
            }
        }
    }

    async fn populate(&self, key: CacheKey, snapshot: CachedSnapshot) {
        let len = snapshot.len();
        match self.cache.set(key, snapshot, self.snapshot_ttl).await {
            Ok(()) => debug!("populated {} with {} entries", key, len),
            Err(e) => warn!("failed to populate {}: {}", key, e),
        }
    }

    async fn invalidate(&self, key: CacheKey) {
        match self.cache.remove(&key).await {
            Ok(removed) => debug!("invalidated {} (entry present: {})", key, removed),
            Err(e) => warn!(
                "failed to invalidate {}, stale for at most {:?}: {}",
                key, self.snapshot_ttl, e
            ),
        }
    }
}

impl std::fmt::Debug for InventoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryRepository")
            .field("snapshot_ttl", &self.snapshot_ttl)
            .finish()
    }
}
