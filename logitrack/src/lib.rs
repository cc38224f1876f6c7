#![deny(clippy::all)]

pub mod auth;
pub mod domain;
pub mod persistence;
pub mod ports;
pub mod repository;
pub mod seed;

pub use domain::{
    CacheKey, CachedSnapshot, InventoryItem, ItemId, Order, OrderId, OrderItemSummary, OrderLine,
    OrderLineView, OrderSummary, OrderView,
};
pub use repository::InventoryRepository;
