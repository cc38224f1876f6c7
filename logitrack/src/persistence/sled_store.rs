use crate::domain::{InventoryItem, ItemId, Order, OrderId, OrderLineView, OrderView};
use crate::ports::InventoryStore;
use async_trait::async_trait;
use shared::{Error, Result};
use sled::transaction::{
    ConflictableTransactionError, ConflictableTransactionResult, TransactionError, Transactional,
    TransactionalTree,
};
use std::collections::HashSet;
use std::path::Path;

const INVENTORY_TREE: &str = "inventory";
const ORDERS_TREE: &str = "orders";
// item id -> number of order lines referencing it
const ITEM_REFS_TREE: &str = "item_refs";

fn id_key(id: u32) -> Vec<u8> {
    id.to_be_bytes().to_vec()
}

fn decode_count(bytes: &[u8]) -> u32 {
    bytes.try_into().map(u32::from_be_bytes).unwrap_or(0)
}

fn abort<T>(err: Error) -> ConflictableTransactionResult<T, Error> {
    Err(ConflictableTransactionError::Abort(err))
}

fn encode<T: serde::Serialize>(value: &T) -> ConflictableTransactionResult<Vec<u8>, Error> {
    serde_json::to_vec(value).map_err(|e| ConflictableTransactionError::Abort(e.into()))
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> ConflictableTransactionResult<T, Error> {
    serde_json::from_slice(bytes).map_err(|e| ConflictableTransactionError::Abort(e.into()))
}

fn tx_error(err: TransactionError<Error>) -> Error {
    match err {
        TransactionError::Abort(e) => e,
        TransactionError::Storage(e) => e.into(),
    }
}

/// Adjusts the reference count of `item_id` by `delta` inside a transaction.
fn bump_refs(
    refs: &TransactionalTree,
    item_id: ItemId,
    delta: i64,
) -> ConflictableTransactionResult<(), Error> {
    let key = id_key(item_id);
    let current = refs.get(&key)?.map(|v| decode_count(&v)).unwrap_or(0) as i64;
    let next = (current + delta).max(0) as u32;
    if next == 0 {
        refs.remove(key)?;
    } else {
        refs.insert(key, next.to_be_bytes().to_vec())?;
    }
    Ok(())
}

/// Sled-backed store. Each order is kept as one document (header and lines)
/// keyed by order id; `item_refs` enforces that referenced items cannot be
/// deleted while an order line points at them.
#[derive(Clone)]
pub struct SledStore {
    db: sled::Db,
    inventory: sled::Tree,
    orders: sled::Tree,
    item_refs: sled::Tree,
}

impl SledStore {
    /// Open (or create) the store at `path`, creating parent directories
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Store(format!("Failed to create directory: {}", e)))?;
        }

        let db = sled::open(path)?;
        Ok(Self {
            inventory: db.open_tree(INVENTORY_TREE)?,
            orders: db.open_tree(ORDERS_TREE)?,
            item_refs: db.open_tree(ITEM_REFS_TREE)?,
            db,
        })
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    fn item_name(&self, id: ItemId) -> Result<String> {
        match self.inventory.get(id_key(id))? {
            Some(bytes) => Ok(serde_json::from_slice::<InventoryItem>(&bytes)?.name),
            None => Ok(String::new()),
        }
    }

    fn to_view(&self, order: Order) -> Result<OrderView> {
        let items = order
            .lines
            .iter()
            .map(|line| -> Result<OrderLineView> {
                Ok(OrderLineView {
                    item_id: line.item_id,
                    name: self.item_name(line.item_id)?,
                    quantity: line.quantity,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(OrderView {
            order_id: order.order_id,
            customer_name: order.customer_name,
            order_placed: order.order_placed,
            items,
        })
    }
}

#[async_trait]
impl InventoryStore for SledStore {
    async fn exists(&self, id: ItemId) -> Result<bool> {
        Ok(self.inventory.contains_key(id_key(id))?)
    }

    async fn add(&self, item: InventoryItem) -> Result<InventoryItem> {
        let value = serde_json::to_vec(&item)?;

        // insert only if absent, so two concurrent adds cannot both win
        let swapped = self
            .inventory
            .compare_and_swap(id_key(item.id), None as Option<&[u8]>, Some(value))?;
        if swapped.is_err() {
            return Err(Error::conflict(format!(
                "an item with id {} already exists",
                item.id
            )));
        }

        self.flush()?;
        Ok(item)
    }

    async fn get_all(&self) -> Result<Vec<InventoryItem>> {
        let mut items = Vec::new();
        for entry in self.inventory.iter() {
            let (_, value) = entry?;
            items.push(serde_json::from_slice(&value)?);
        }
        Ok(items)
    }

    async fn get_by_id(&self, id: ItemId) -> Result<Option<InventoryItem>> {
        match self.inventory.get(id_key(id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, item: InventoryItem) -> Result<InventoryItem> {
        let result: std::result::Result<(), TransactionError<Error>> =
            self.inventory.transaction(|inventory| {
                let key = id_key(item.id);
                if inventory.get(&key)?.is_none() {
                    return abort(Error::not_found(format!(
                        "inventory item with id {} was not found",
                        item.id
                    )));
                }
                inventory.insert(key, encode(&item)?)?;
                Ok(())
            });
        result.map_err(tx_error)?;

        self.flush()?;
        Ok(item)
    }

    async fn delete(&self, id: ItemId) -> Result<bool> {
        let result: std::result::Result<bool, TransactionError<Error>> =
            (&self.inventory, &self.item_refs).transaction(|(inventory, refs)| {
                let key = id_key(id);
                if inventory.get(&key)?.is_none() {
                    return Ok(false);
                }
                if let Some(count) = refs.get(&key)? {
                    let count = decode_count(&count);
                    if count > 0 {
                        return abort(Error::conflict(format!(
                            "inventory item {} is referenced by {} order line(s)",
                            id, count
                        )));
                    }
                }
                inventory.remove(key)?;
                Ok(true)
            });
        let deleted = result.map_err(tx_error)?;

        if deleted {
            self.flush()?;
        }
        Ok(deleted)
    }

    async fn add_order(&self, order: Order) -> Result<Order> {
        let result: std::result::Result<(), TransactionError<Error>> =
            (&self.inventory, &self.orders, &self.item_refs).transaction(
                |(inventory, orders, refs)| {
                    let key = id_key(order.order_id);
                    if orders.get(&key)?.is_some() {
                        return abort(Error::conflict(format!(
                            "an order with id {} already exists",
                            order.order_id
                        )));
                    }

                    let mut seen = HashSet::with_capacity(order.lines.len());
                    for line in &order.lines {
                        if !seen.insert(line.item_id) {
                            return abort(Error::validation(format!(
                                "order {} lists item {} more than once",
                                order.order_id, line.item_id
                            )));
                        }
                        if inventory.get(id_key(line.item_id))?.is_none() {
                            return abort(Error::validation(format!(
                                "order {} references unknown inventory item {}",
                                order.order_id, line.item_id
                            )));
                        }
                        bump_refs(refs, line.item_id, 1)?;
                    }

                    orders.insert(key, encode(&order)?)?;
                    Ok(())
                },
            );
        result.map_err(tx_error)?;

        self.flush()?;
        Ok(order)
    }

    async fn get_order_by_id(&self, id: OrderId) -> Result<Option<OrderView>> {
        match self.orders.get(id_key(id))? {
            Some(bytes) => {
                let order: Order = serde_json::from_slice(&bytes)?;
                Ok(Some(self.to_view(order)?))
            }
            None => Ok(None),
        }
    }

    async fn get_all_orders(&self) -> Result<Vec<OrderView>> {
        let mut views = Vec::new();
        for entry in self.orders.iter() {
            let (_, value) = entry?;
            let order: Order = serde_json::from_slice(&value)?;
            views.push(self.to_view(order)?);
        }
        Ok(views)
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool> {
        let result: std::result::Result<bool, TransactionError<Error>> =
            (&self.orders, &self.item_refs).transaction(|(orders, refs)| {
                let key = id_key(id);
                let Some(bytes) = orders.get(&key)? else {
                    return Ok(false);
                };
                let order: Order = decode(&bytes)?;
                for line in &order.lines {
                    bump_refs(refs, line.item_id, -1)?;
                }
                orders.remove(key)?;
                Ok(true)
            });
        let deleted = result.map_err(tx_error)?;

        if deleted {
            self.flush()?;
        }
        Ok(deleted)
    }
}
