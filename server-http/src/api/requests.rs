use chrono::{DateTime, Utc};
use logitrack::{InventoryItem, ItemId, Order, OrderId, OrderLine};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignManagerRequest {
    pub username: String,
}

/// Body of `PUT /inventory/{id}`; the id comes from the path
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryRequest {
    pub name: String,
    pub quantity: i32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub price: f64,
}

impl UpdateInventoryRequest {
    pub fn into_item(self, id: ItemId) -> InventoryItem {
        InventoryItem::new(id, self.name, self.quantity, self.location, self.price)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_id: OrderId,
    pub customer_name: String,
    /// Defaults to the time the request is handled
    #[serde(default)]
    pub order_placed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

impl From<CreateOrderRequest> for Order {
    fn from(req: CreateOrderRequest) -> Self {
        Order::new(
            req.order_id,
            req.customer_name,
            req.order_placed.unwrap_or_else(Utc::now),
            req.items,
        )
    }
}
