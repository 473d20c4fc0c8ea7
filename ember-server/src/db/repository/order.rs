//! Order Repository
//!
//! Order creation is the one multi-row write in the platform: the order,
//! its line snapshots and the cart-line deletion commit as a single
//! transaction, so a failure anywhere leaves both the cart and the order
//! table untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::serde_helpers;
use crate::db::models::{CustomerName, MenuItem, Order, OrderItemView, OrderStatus, OrderView};
use crate::utils::time::now_millis;

/// Line snapshot bound into the order-placement transaction
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineSnapshot {
    pub menu_item: RecordId,
    pub name: String,
    pub quantity: i64,
    /// Live menu price at submission time, locked in for the order
    pub price: f64,
    pub notes: Option<String>,
}

/// Per-status order count (kitchen metrics)
#[derive(Debug, Clone, Deserialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Atomically create the order with its line snapshots and clear the
    /// source cart's lines
    ///
    /// The caller allocates the order id up front so no result needs to be
    /// read back out of the transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn place(
        &self,
        order_id: &RecordId,
        user: &RecordId,
        cart: &RecordId,
        lines: Vec<OrderLineSnapshot>,
        total: f64,
        delivery_eta: Option<String>,
        notes: Option<String>,
    ) -> RepoResult<()> {
        let now = now_millis();
        self.base
            .db()
            .query(
                r#"
                BEGIN TRANSACTION;
                CREATE $order_id CONTENT {
                    user: $user,
                    status: $status,
                    total: $total,
                    delivery_eta: $delivery_eta,
                    notes: $notes,
                    created_at: $now,
                    updated_at: $now
                };
                FOR $line IN $lines {
                    CREATE order_item CONTENT {
                        order: $order_id,
                        menu_item: $line.menu_item,
                        name: $line.name,
                        quantity: $line.quantity,
                        price: $line.price,
                        notes: $line.notes
                    };
                };
                DELETE cart_item WHERE cart = $cart;
                COMMIT TRANSACTION;
                "#,
            )
            .bind(("order_id", order_id.clone()))
            .bind(("user", user.clone()))
            .bind(("cart", cart.clone()))
            .bind(("status", OrderStatus::Pending))
            .bind(("total", total))
            .bind(("delivery_eta", delivery_eta))
            .bind(("notes", notes))
            .bind(("now", now))
            .bind(("lines", lines))
            .await?
            .check()
            .map_err(|e| RepoError::Database(format!("Order transaction failed: {e}")))?;
        Ok(())
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Update the status field, bumping `updated_at`
    pub async fn set_status(&self, order: &RecordId, status: OrderStatus) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $order SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("order", order.clone()))
            .bind(("status", status))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order)))
    }

    /// One order with lines and customer hydrated
    pub async fn view(&self, order: &RecordId) -> RepoResult<Option<OrderView>> {
        let row: Option<Order> = self.base.db().select(order.clone()).await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut views = self.hydrate(vec![row]).await?;
        Ok(views.pop())
    }

    /// Orders of one user, newest-first
    pub async fn list_for_user(&self, user: &RecordId) -> RepoResult<Vec<OrderView>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        self.hydrate(orders).await
    }

    /// Every order, newest-first (staff view)
    pub async fn list_all(&self) -> RepoResult<Vec<OrderView>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        self.hydrate(orders).await
    }

    /// Kitchen queue projection: active orders, oldest-first
    ///
    /// Purely derived: COMPLETED and CANCELLED rows never appear here.
    pub async fn kitchen_queue(&self) -> RepoResult<Vec<OrderView>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE status IN $statuses ORDER BY created_at ASC")
            .bind(("statuses", active_statuses()))
            .await?
            .take(0)?;
        self.hydrate(orders).await
    }

    /// Per-status counts over the active statuses
    pub async fn status_counts(&self) -> RepoResult<Vec<StatusCount>> {
        let counts: Vec<StatusCount> = self
            .base
            .db()
            .query(
                "SELECT status, count() AS count FROM order \
                 WHERE status IN $statuses GROUP BY status",
            )
            .bind(("statuses", active_statuses()))
            .await?
            .take(0)?;
        Ok(counts)
    }

    /// Attach hydrated lines and customer names to raw order rows
    async fn hydrate(&self, orders: Vec<Order>) -> RepoResult<Vec<OrderView>> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        #[derive(Debug, Deserialize)]
        struct ItemRow {
            #[serde(with = "serde_helpers::record_id")]
            order: RecordId,
            #[serde(default, with = "serde_helpers::option_record_id")]
            id: Option<RecordId>,
            #[serde(default)]
            menu_item: Option<MenuItem>,
            name: String,
            quantity: i64,
            price: f64,
            #[serde(default)]
            notes: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct UserRow {
            #[serde(with = "serde_helpers::record_id")]
            id: RecordId,
            #[serde(default)]
            first_name: Option<String>,
            #[serde(default)]
            last_name: Option<String>,
        }

        let order_ids: Vec<RecordId> = orders.iter().filter_map(|o| o.id.clone()).collect();
        let item_rows: Vec<ItemRow> = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE order IN $orders FETCH menu_item")
            .bind(("orders", order_ids))
            .await?
            .take(0)?;

        let mut items_by_order: HashMap<String, Vec<OrderItemView>> = HashMap::new();
        for row in item_rows {
            items_by_order
                .entry(row.order.to_string())
                .or_default()
                .push(OrderItemView {
                    id: row.id,
                    menu_item: row.menu_item,
                    name: row.name,
                    quantity: row.quantity,
                    price: row.price,
                    notes: row.notes,
                });
        }

        let user_ids: Vec<RecordId> = orders.iter().map(|o| o.user.clone()).collect();
        let user_rows: Vec<UserRow> = self
            .base
            .db()
            .query("SELECT id, first_name, last_name FROM user WHERE id IN $users")
            .bind(("users", user_ids))
            .await?
            .take(0)?;
        let names: HashMap<String, CustomerName> = user_rows
            .into_iter()
            .map(|u| {
                (
                    u.id.to_string(),
                    CustomerName {
                        first_name: u.first_name,
                        last_name: u.last_name,
                    },
                )
            })
            .collect();

        Ok(orders
            .into_iter()
            .map(|order| {
                let key = order.id_string();
                let customer = names.get(&order.user.to_string()).cloned();
                OrderView {
                    items: items_by_order.remove(&key).unwrap_or_default(),
                    customer,
                    id: order.id,
                    user: order.user,
                    status: order.status,
                    total: order.total,
                    delivery_eta: order.delivery_eta,
                    notes: order.notes,
                    created_at: order.created_at,
                    updated_at: order.updated_at,
                }
            })
            .collect())
    }
}

fn active_statuses() -> Vec<OrderStatus> {
    OrderStatus::ACTIVE.to_vec()
}
