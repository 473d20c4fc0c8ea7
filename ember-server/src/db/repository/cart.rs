//! Cart Repository
//!
//! The add-item path is the one concurrency-sensitive spot in the whole
//! platform: "increment the line or insert it" must be atomic. Lines use a
//! deterministic record id derived from (cart, menu item), so the whole
//! operation is a single storage-level `UPSERT`: concurrent adds for the
//! same menu entry serialize inside the engine and can never produce two
//! lines or a lost increment.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cart, CartItem, CartItemView, CartView};
use crate::utils::time::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find cart by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Cart>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let cart: Option<Cart> = self.base.db().select(thing).await?;
        Ok(cart)
    }

    /// Return the user's cart, creating it on first access
    ///
    /// The unique index on `cart.user` settles a concurrent first access:
    /// the loser's CREATE fails and the winner's row is re-read.
    pub async fn get_or_create(&self, user: &RecordId) -> RepoResult<Cart> {
        if let Some(cart) = self.find_by_user(user).await? {
            return Ok(cart);
        }

        let create = self
            .base
            .db()
            .query("CREATE cart SET user = $user, created_at = $now RETURN AFTER")
            .bind(("user", user.clone()))
            .bind(("now", now_millis()))
            .await?
            .take::<Option<Cart>>(0);

        match create {
            Ok(Some(cart)) => Ok(cart),
            _ => self
                .find_by_user(user)
                .await?
                .ok_or_else(|| RepoError::Database("Failed to create cart".to_string())),
        }
    }

    async fn find_by_user(&self, user: &RecordId) -> RepoResult<Option<Cart>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user = $user LIMIT 1")
            .bind(("user", user.clone()))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Add a menu item to the cart (or increment the existing line)
    ///
    /// Notes are kept from the first write; an increment does not
    /// overwrite them.
    pub async fn add_item(
        &self,
        cart: &RecordId,
        menu_item: &RecordId,
        quantity: i64,
        notes: Option<String>,
    ) -> RepoResult<CartItem> {
        if quantity < 1 {
            return Err(RepoError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let line = RecordId::from_table_key(
            "cart_item",
            format!("{}_{}", cart.key(), menu_item.key()),
        );

        let mut result = self
            .base
            .db()
            .query(
                r#"UPSERT $line SET
                    cart = $cart,
                    menu_item = $menu_item,
                    quantity = (quantity ?? 0) + $quantity,
                    notes = notes ?? $notes,
                    created_at = created_at ?? $now
                RETURN AFTER"#,
            )
            .bind(("line", line))
            .bind(("cart", cart.clone()))
            .bind(("menu_item", menu_item.clone()))
            .bind(("quantity", quantity))
            .bind(("notes", notes))
            .bind(("now", now_millis()))
            .await?;

        let item: Option<CartItem> = result.take(0)?;
        item.ok_or_else(|| RepoError::Database("Failed to upsert cart item".to_string()))
    }

    /// Replace a line's quantity
    pub async fn update_item(&self, item_id: &str, quantity: i64) -> RepoResult<CartItem> {
        if quantity < 1 {
            return Err(RepoError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let thing: RecordId = item_id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", item_id)))?;

        let mut result = self
            .base
            .db()
            .query("UPDATE $line SET quantity = $quantity RETURN AFTER")
            .bind(("line", thing))
            .bind(("quantity", quantity))
            .await?;

        result
            .take::<Option<CartItem>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Cart item {} not found", item_id)))
    }

    /// Delete a line
    pub async fn remove_item(&self, item_id: &str) -> RepoResult<()> {
        let thing: RecordId = item_id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", item_id)))?;

        let deleted: Option<CartItem> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!(
                "Cart item {} not found",
                item_id
            )));
        }
        Ok(())
    }

    /// Delete every line of the cart
    pub async fn clear(&self, cart: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart_item WHERE cart = $cart")
            .bind(("cart", cart.clone()))
            .await?
            .check()?;
        Ok(())
    }

    /// Hydrated lines for a cart, oldest-first
    pub async fn lines(&self, cart: &RecordId) -> RepoResult<Vec<CartItemView>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM cart_item WHERE cart = $cart ORDER BY created_at ASC FETCH menu_item",
            )
            .bind(("cart", cart.clone()))
            .await?;
        let lines: Vec<CartItemView> = result.take(0)?;
        Ok(lines)
    }

    /// One hydrated line by id
    pub async fn line_view(&self, line: &RecordId) -> RepoResult<Option<CartItemView>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM $line FETCH menu_item")
            .bind(("line", line.clone()))
            .await?;
        let lines: Vec<CartItemView> = result.take(0)?;
        Ok(lines.into_iter().next())
    }

    /// Full cart as returned by the cart endpoints
    pub async fn view(&self, cart: &Cart) -> RepoResult<CartView> {
        let cart_id = cart
            .id
            .as_ref()
            .ok_or_else(|| RepoError::Database("Cart row without id".to_string()))?;
        let items = self.lines(cart_id).await?;
        Ok(CartView {
            id: cart.id_string(),
            items,
        })
    }
}
