use crate::domain::{
    InventoryItem, ItemId, Order, OrderId, OrderLine, OrderLineView, OrderView,
};
use crate::ports::InventoryStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::{Error, Result};
use std::collections::{BTreeMap, HashSet};

#[derive(Clone, Debug)]
struct OrderRow {
    customer_name: String,
    order_placed: DateTime<Utc>,
    // kept in insertion order
    lines: Vec<OrderLine>,
}

#[derive(Default)]
struct Tables {
    items: BTreeMap<ItemId, InventoryItem>,
    orders: BTreeMap<OrderId, OrderRow>,
}

impl Tables {
    fn view(&self, order_id: OrderId, row: &OrderRow) -> OrderView {
        let items = row
            .lines
            .iter()
            .map(|line| OrderLineView {
                item_id: line.item_id,
                name: self
                    .items
                    .get(&line.item_id)
                    .map(|i| i.name.clone())
                    .unwrap_or_default(),
                quantity: line.quantity,
            })
            .collect();

        OrderView {
            order_id,
            customer_name: row.customer_name.clone(),
            order_placed: row.order_placed,
            items,
        }
    }

    fn referencing_order(&self, item_id: ItemId) -> Option<OrderId> {
        self.orders
            .iter()
            .find(|(_, row)| row.lines.iter().any(|line| line.item_id == item_id))
            .map(|(order_id, _)| *order_id)
    }
}

/// Process-local store; every operation runs under one table lock, so
/// multi-row writes are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn exists(&self, id: ItemId) -> Result<bool> {
        Ok(self.tables.read().items.contains_key(&id))
    }

    async fn add(&self, item: InventoryItem) -> Result<InventoryItem> {
        let mut tables = self.tables.write();
        if tables.items.contains_key(&item.id) {
            return Err(Error::conflict(format!(
                "an item with id {} already exists",
                item.id
            )));
        }
        tables.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_all(&self) -> Result<Vec<InventoryItem>> {
        Ok(self.tables.read().items.values().cloned().collect())
    }

    async fn get_by_id(&self, id: ItemId) -> Result<Option<InventoryItem>> {
        Ok(self.tables.read().items.get(&id).cloned())
    }

    async fn update(&self, item: InventoryItem) -> Result<InventoryItem> {
        let mut tables = self.tables.write();
        match tables.items.get_mut(&item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(item)
            }
            None => Err(Error::not_found(format!(
                "inventory item with id {} was not found",
                item.id
            ))),
        }
    }

    async fn delete(&self, id: ItemId) -> Result<bool> {
        let mut tables = self.tables.write();
        if !tables.items.contains_key(&id) {
            return Ok(false);
        }
        if let Some(order_id) = tables.referencing_order(id) {
            return Err(Error::conflict(format!(
                "inventory item {} is referenced by order {}",
                id, order_id
            )));
        }
        Ok(tables.items.remove(&id).is_some())
    }

    async fn add_order(&self, order: Order) -> Result<Order> {
        let mut tables = self.tables.write();
        if tables.orders.contains_key(&order.order_id) {
            return Err(Error::conflict(format!(
                "an order with id {} already exists",
                order.order_id
            )));
        }
        let mut seen = HashSet::with_capacity(order.lines.len());
        for OrderLine { item_id, .. } in &order.lines {
            if !tables.items.contains_key(item_id) {
                return Err(Error::validation(format!(
                    "order {} references unknown inventory item {}",
                    order.order_id, item_id
                )));
            }
            if !seen.insert(*item_id) {
                return Err(Error::validation(format!(
                    "order {} lists item {} more than once",
                    order.order_id, item_id
                )));
            }
        }

        tables.orders.insert(
            order.order_id,
            OrderRow {
                customer_name: order.customer_name.clone(),
                order_placed: order.order_placed,
                lines: order.lines.clone(),
            },
        );
        Ok(order)
    }

    async fn get_order_by_id(&self, id: OrderId) -> Result<Option<OrderView>> {
        let tables = self.tables.read();
        Ok(tables.orders.get(&id).map(|row| tables.view(id, row)))
    }

    async fn get_all_orders(&self) -> Result<Vec<OrderView>> {
        let tables = self.tables.read();
        Ok(tables
            .orders
            .iter()
            .map(|(id, row)| tables.view(*id, row))
            .collect())
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool> {
        let mut tables = self.tables.write();
        Ok(tables.orders.remove(&id).is_some())
    }
}
