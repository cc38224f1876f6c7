pub mod auth;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod roles;
pub mod summaries;

pub use auth::{login, logout, register};
pub use health::health_check;
pub use inventory::{
    create_inventory, delete_inventory, get_inventory, list_inventory, update_inventory,
};
pub use orders::{create_order, delete_order, get_order, list_orders};
pub use roles::assign_manager;
pub use summaries::{get_order_summary, list_order_summaries};
