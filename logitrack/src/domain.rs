use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::config::CacheBackend;
use shared::{Error, Result};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub type ItemId = u32;
pub type OrderId = u32;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub quantity: i32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub price: f64,
}

impl InventoryItem {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        quantity: i32,
        location: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            location: location.into(),
            price,
        }
    }

    /// Rejects an empty name, a negative quantity or a negative/non-finite price.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation(format!(
                "inventory item {} must have a non-empty name",
                self.id
            )));
        }
        if self.quantity < 0 {
            return Err(Error::validation(format!(
                "inventory item {} has negative quantity {}",
                self.id, self.quantity
            )));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::validation(format!(
                "inventory item {} has invalid price {}",
                self.id, self.price
            )));
        }
        Ok(())
    }

    pub fn display_info(&self) -> String {
        format!("{}: {}", self.id, self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item_id: ItemId,
    pub quantity: i32,
}

impl OrderLine {
    pub fn new(item_id: ItemId, quantity: i32) -> Self {
        Self { item_id, quantity }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub customer_name: String,
    pub order_placed: DateTime<Utc>,
    #[serde(rename = "items", default)]
    pub lines: Vec<OrderLine>,
}

impl Order {
    pub fn new(
        order_id: OrderId,
        customer_name: impl Into<String>,
        order_placed: DateTime<Utc>,
        lines: Vec<OrderLine>,
    ) -> Self {
        Self {
            order_id,
            customer_name: customer_name.into(),
            order_placed,
            lines,
        }
    }

    /// Checks the header and that `(order_id, item_id)` stays unique across lines.
    pub fn validate(&self) -> Result<()> {
        if self.customer_name.trim().is_empty() {
            return Err(Error::validation(format!(
                "order {} must have a non-empty customer name",
                self.order_id
            )));
        }

        let mut seen = HashSet::with_capacity(self.lines.len());
        for line in &self.lines {
            if line.quantity < 1 {
                return Err(Error::validation(format!(
                    "order {} line for item {} has quantity {}, expected at least 1",
                    self.order_id, line.item_id, line.quantity
                )));
            }
            if !seen.insert(line.item_id) {
                return Err(Error::validation(format!(
                    "order {} lists item {} more than once",
                    self.order_id, line.item_id
                )));
            }
        }
        Ok(())
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Order #{} for {} | Items: {} | Placed: {}",
            self.order_id,
            self.customer_name,
            self.lines.len(),
            self.order_placed.format("%Y-%m-%d")
        )
    }
}

/// Order line joined with the name of the item it references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: i32,
}

/// Eager-loaded order: header plus joined lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: OrderId,
    pub customer_name: String,
    pub order_placed: DateTime<Utc>,
    pub items: Vec<OrderLineView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemSummary {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderItemSummary>,
}

impl From<OrderView> for OrderSummary {
    fn from(view: OrderView) -> Self {
        Self {
            order_id: view.order_id,
            order_date: view.order_placed,
            items: view
                .items
                .into_iter()
                .map(|line| OrderItemSummary {
                    item_id: line.item_id,
                    name: line.name,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

/// The snapshots the repository keeps in the shared cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    InventoryAll,
    OrderSummariesAll,
}

impl CacheKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::InventoryAll => "inventory_all",
            CacheKey::OrderSummariesAll => "order_summaries_all",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub enum CachedSnapshot {
    Inventory(Arc<Vec<InventoryItem>>),
    OrderSummaries(Arc<Vec<OrderSummary>>),
}

impl CachedSnapshot {
    pub fn len(&self) -> usize {
        match self {
            CachedSnapshot::Inventory(items) => items.len(),
            CachedSnapshot::OrderSummaries(summaries) => summaries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub name: String,
    pub backend: CacheBackend,
    pub default_ttl: Duration,
    pub max_entries: Option<u64>,
}

impl CacheConfig {
    pub fn new(
        name: impl Into<String>,
        backend: CacheBackend,
        default_ttl: Duration,
        max_entries: Option<u64>,
    ) -> Self {
        Self {
            name: name.into(),
            backend,
            default_ttl,
            max_entries,
        }
    }
}
