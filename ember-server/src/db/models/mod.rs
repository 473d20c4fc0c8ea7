//! Database Models
//!
//! Serde structs matching the SurrealDB tables. `*View` variants carry
//! hydrated record links for API responses.

pub mod analytics;
pub mod cart;
pub mod menu;
pub mod order;
pub mod serde_helpers;
pub mod user;

pub use analytics::AnalyticsEvent;
pub use cart::{Cart, CartItem, CartItemView, CartView};
pub use menu::{MenuCategory, MenuItem, MenuItemCreate, MenuItemDetail};
pub use order::{CustomerName, Order, OrderItem, OrderItemView, OrderStatus, OrderView};
pub use user::{Role, User, UserCreate};
