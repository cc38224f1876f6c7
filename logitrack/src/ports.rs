#![deny(clippy::all)]

use crate::domain::{
    CacheConfig, InventoryItem, ItemId, Order, OrderId, OrderSummary, OrderView,
};
use async_trait::async_trait;
use shared::Result;
use std::sync::Arc;
use std::time::Duration;

// Ports are the pluggable seams between the repository and its backends

/// Port for persisting inventory items and orders
#[async_trait]
pub trait InventoryStore: Send + Sync + 'static {
    async fn exists(&self, id: ItemId) -> Result<bool>;

    /// Fails with `Error::Conflict` when the id is already taken
    async fn add(&self, item: InventoryItem) -> Result<InventoryItem>;

    /// All items, ascending by id
    async fn get_all(&self) -> Result<Vec<InventoryItem>>;

    async fn get_by_id(&self, id: ItemId) -> Result<Option<InventoryItem>>;

    /// Fails with `Error::NotFound` when no item has this id
    async fn update(&self, item: InventoryItem) -> Result<InventoryItem>;

    /// Returns whether a row was removed
    async fn delete(&self, id: ItemId) -> Result<bool>;

    /// Writes header and lines in one transaction
    async fn add_order(&self, order: Order) -> Result<Order>;

    async fn get_order_by_id(&self, id: OrderId) -> Result<Option<OrderView>>;

    async fn get_all_orders(&self) -> Result<Vec<OrderView>>;

    /// Removes header and lines in one transaction
    async fn delete_order(&self, id: OrderId) -> Result<bool>;

    async fn get_order_summary(&self, id: OrderId) -> Result<Option<OrderSummary>> {
        Ok(self.get_order_by_id(id).await?.map(OrderSummary::from))
    }

    async fn get_all_order_summaries(&self) -> Result<Vec<OrderSummary>> {
        Ok(self
            .get_all_orders()
            .await?
            .into_iter()
            .map(OrderSummary::from)
            .collect())
    }
}

/// Port for a TTL cache
#[async_trait]
pub trait CacheStore<K, V>: Send + Sync + 'static {
    /// `None` when the key is absent or its entry has expired
    async fn get(&self, key: &K) -> Result<Option<V>>;

    /// Overwrites any existing entry and restarts its expiry countdown
    async fn set(&self, key: K, val: V, ttl: Duration) -> Result<()>;

    /// Idempotent; returns whether a live entry was removed
    async fn remove(&self, key: &K) -> Result<bool>;
}

/// Port for creating cache storage from configuration
/// This allows different cache backends to be plugged in
pub trait StorageFactory<K, V>: Send + Sync + 'static {
    fn create_from_config(&self, config: &CacheConfig) -> Arc<dyn CacheStore<K, V>>;
}
