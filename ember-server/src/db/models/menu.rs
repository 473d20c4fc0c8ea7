//! Menu Models
//!
//! Read-mostly reference data: categories and items. Item prices here are
//! the *live* prices; orders snapshot them at submission time.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Menu category ID type
pub type MenuCategoryId = RecordId;

/// Menu item ID type
pub type MenuItemId = RecordId;

/// Menu category (slug is the stable lookup key used in item filters)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MenuCategoryId>,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Menu item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MenuItemId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Record link to menu_category
    #[serde(with = "serde_helpers::record_id")]
    pub category: MenuCategoryId,
    #[serde(default)]
    pub dietary: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub spice_level: i32,
    #[serde(default)]
    pub prep_time_minutes: Option<i32>,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i64,
}

/// Menu item with its category hydrated (item detail endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDetail {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MenuItemId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: MenuCategory,
    #[serde(default)]
    pub dietary: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub spice_level: i32,
    #[serde(default)]
    pub prep_time_minutes: Option<i32>,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i64,
}

/// Create menu item payload (seeding and fixtures)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub category: MenuCategoryId,
    pub dietary: Vec<String>,
    pub allergens: Vec<String>,
    pub spice_level: i32,
    pub prep_time_minutes: Option<i32>,
    pub is_popular: bool,
    pub rating: f64,
    pub review_count: i64,
}

impl MenuItemCreate {
    /// Minimal item with just name, price and category
    pub fn new(name: impl Into<String>, price: f64, category: MenuCategoryId) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            image_url: None,
            category,
            dietary: vec![],
            allergens: vec![],
            spice_level: 0,
            prep_time_minutes: None,
            is_popular: false,
            rating: 0.0,
            review_count: 0,
        }
    }
}
