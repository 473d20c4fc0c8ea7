//! Cart Models
//!
//! A cart is the user's in-progress, mutable selection prior to order
//! submission. The cart row itself persists across orders; submission only
//! clears its lines.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::menu::MenuItem;
use super::serde_helpers;

/// Cart ID type
pub type CartId = RecordId;

/// Cart item ID type
pub type CartItemId = RecordId;

/// Cart row (one per user, created lazily on first access)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CartId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(default)]
    pub created_at: i64,
}

impl Cart {
    /// Record id as "cart:..." string
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }
}

/// A single cart line
///
/// The record id is deterministic (`cart_item:⟨cart⟩_⟨menu item⟩`), which
/// is what makes add-item an atomic increment-or-insert at the storage
/// layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CartItemId>,
    #[serde(with = "serde_helpers::record_id")]
    pub cart: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

/// Cart line with the menu item hydrated (API responses)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CartItemId>,
    pub menu_item: MenuItem,
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Full cart as returned by the cart endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: String,
    pub items: Vec<CartItemView>,
}
