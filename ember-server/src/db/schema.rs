//! Schema Definition
//!
//! Tables and indexes applied at startup. Statements are idempotent
//! (`IF NOT EXISTS`), so re-running on every boot is safe.
//!
//! The unique indexes are load-bearing:
//! - `user.email` backs the 409 on duplicate registration
//! - `cart.user` guarantees one cart per user
//! - `menu_category.slug` keeps category filter keys stable

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::utils::AppError;

const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS user_email ON user FIELDS email UNIQUE;

    DEFINE TABLE IF NOT EXISTS menu_category SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS menu_category_slug ON menu_category FIELDS slug UNIQUE;

    DEFINE TABLE IF NOT EXISTS menu_item SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS menu_item_category ON menu_item FIELDS category;

    DEFINE TABLE IF NOT EXISTS cart SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS cart_user ON cart FIELDS user UNIQUE;

    DEFINE TABLE IF NOT EXISTS cart_item SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS cart_item_cart ON cart_item FIELDS cart;

    DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS order_user ON order FIELDS user;
    DEFINE INDEX IF NOT EXISTS order_status ON order FIELDS status;

    DEFINE TABLE IF NOT EXISTS order_item SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS order_item_order ON order_item FIELDS order;

    DEFINE TABLE IF NOT EXISTS analytics_event SCHEMALESS;
"#;

/// Apply the schema to a freshly opened database
pub async fn define(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(SCHEMA)
        .await
        .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?
        .check()
        .map_err(|e| AppError::database(format!("Schema statement failed: {e}")))?;
    Ok(())
}
