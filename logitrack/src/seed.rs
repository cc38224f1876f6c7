use crate::domain::{InventoryItem, Order, OrderLine};
use crate::repository::InventoryRepository;
use chrono::Utc;
use shared::Result;
use tracing::info;

/// Seed a couple of items and one order when the store has no inventory yet.
/// Writes go through the repository so cached snapshots stay coherent.
/// Returns whether anything was written.
pub async fn seed_sample_data(repo: &InventoryRepository) -> Result<bool> {
    if !repo.get_all_inventory().await?.is_empty() {
        info!("Store already has inventory, skipping sample data");
        return Ok(false);
    }

    let laptop = repo
        .add_inventory(InventoryItem::new(1, "Laptop", 10, "Warehouse A", 999.99))
        .await?;
    let mouse = repo
        .add_inventory(InventoryItem::new(2, "Mouse", 50, "Warehouse B", 19.99))
        .await?;
    info!("Seeded {} and {}", laptop.display_info(), mouse.display_info());

    if repo.get_order_by_id(1).await?.is_none() {
        let order = repo
            .add_order(Order::new(
                1,
                "John Doe",
                Utc::now(),
                vec![OrderLine::new(laptop.id, 2), OrderLine::new(mouse.id, 5)],
            ))
            .await?;
        info!("Seeded {}", order.summary_line());
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CacheKey, CachedSnapshot};
    use crate::persistence::MemoryStore;
    use crate::ports::CacheStore;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct NoCache;

    #[async_trait]
    impl CacheStore<CacheKey, CachedSnapshot> for NoCache {
        async fn get(&self, _key: &CacheKey) -> Result<Option<CachedSnapshot>> {
            Ok(None)
        }
        async fn set(&self, _key: CacheKey, _val: CachedSnapshot, _ttl: Duration) -> Result<()> {
            Ok(())
        }
        async fn remove(&self, _key: &CacheKey) -> Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_seed_runs_once() {
        let repo = InventoryRepository::new(
            Arc::new(MemoryStore::new()),
            Arc::new(NoCache),
            Duration::from_secs(60),
        );

        assert!(seed_sample_data(&repo).await.unwrap());
        assert!(!seed_sample_data(&repo).await.unwrap());

        assert_eq!(repo.get_all_inventory().await.unwrap().len(), 2);
        let summary = repo.get_order_summary(1).await.unwrap().unwrap();
        assert_eq!(summary.items.len(), 2);
        assert_eq!(summary.items[0].name, "Laptop");
    }
}
