//! Order Service
//!
//! Converts a cart into an immutable-priced order and drives subsequent
//! status changes. Every successful mutation fans out `order:update` and
//! `kitchen:update` through the injected [`EventPublisher`]; the service
//! never talks to the websocket layer directly, so tests can substitute a
//! recording fake.

use std::sync::Arc;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use uuid::Uuid;

use shared::realtime::{Event, KitchenItem, KitchenUpdatePayload, OrderUpdatePayload};

use crate::db::models::{OrderStatus, OrderView};
use crate::db::repository::order::OrderLineSnapshot;
use crate::db::repository::{AnalyticsRepository, CartRepository, OrderRepository, RepoError};
use crate::orders::money;
use crate::realtime::EventPublisher;
use crate::utils::{AppError, AppResult};

pub struct OrderService {
    orders: OrderRepository,
    carts: CartRepository,
    analytics: AnalyticsRepository,
    publisher: Arc<dyn EventPublisher>,
}

impl OrderService {
    pub fn new(db: Surreal<Db>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            carts: CartRepository::new(db.clone()),
            analytics: AnalyticsRepository::new(db),
            publisher,
        }
    }

    /// Place an order from the user's cart
    ///
    /// The total is Σ(live menu price × quantity) at submission time;
    /// that price is locked in for the order regardless of later menu
    /// edits. Order creation, line snapshots and cart clearing commit as
    /// one transaction; events are published only after the commit.
    pub async fn place_order(
        &self,
        user: &RecordId,
        cart_id: &str,
        delivery_eta: Option<String>,
        notes: Option<String>,
    ) -> AppResult<OrderView> {
        // Cart must exist and belong to the caller. An unparseable id is
        // indistinguishable from a missing cart on purpose.
        let cart = match self.carts.find_by_id(cart_id).await {
            Ok(cart) => cart,
            Err(RepoError::Validation(_)) => None,
            Err(e) => return Err(e.into()),
        };
        let cart = cart
            .filter(|c| &c.user == user)
            .ok_or_else(|| AppError::not_found("Cart not found"))?;
        let cart_rid = cart
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Cart row without id"))?;

        let lines = self.carts.lines(&cart_rid).await?;
        if lines.is_empty() {
            return Err(AppError::validation("Cart is empty"));
        }

        let total = money::order_total(
            lines
                .iter()
                .map(|line| (line.menu_item.price, line.quantity)),
        );

        let snapshots: Vec<OrderLineSnapshot> = lines
            .iter()
            .map(|line| {
                let menu_item = line
                    .menu_item
                    .id
                    .clone()
                    .ok_or_else(|| AppError::internal("Menu item row without id"))?;
                Ok(OrderLineSnapshot {
                    menu_item,
                    name: line.menu_item.name.clone(),
                    quantity: line.quantity,
                    price: line.menu_item.price,
                    notes: line.notes.clone(),
                })
            })
            .collect::<AppResult<_>>()?;

        let order_id = RecordId::from_table_key("order", Uuid::new_v4().simple().to_string());
        self.orders
            .place(
                &order_id,
                user,
                &cart_rid,
                snapshots,
                total,
                delivery_eta,
                notes,
            )
            .await?;

        let view = self
            .orders
            .view(&order_id)
            .await?
            .ok_or_else(|| AppError::internal("Order vanished after commit"))?;

        tracing::info!(
            order_id = %view.id_string(),
            user_id = %user,
            total = total,
            lines = view.items.len(),
            "Order placed"
        );

        self.publish_updates(&view, false);
        self.record_placed(&view).await;

        Ok(view)
    }

    /// Update an order's status
    ///
    /// Membership in the five recognized statuses is the only rule: any
    /// status may follow any other. Unknown values are rejected before the
    /// row is touched.
    pub async fn set_status(&self, order_id: &str, status: &str) -> AppResult<OrderView> {
        let status: OrderStatus = status
            .parse()
            .map_err(|_| AppError::validation("Invalid status"))?;

        let order_rid: RecordId = order_id
            .parse()
            .map_err(|_| AppError::not_found(format!("Order {} not found", order_id)))?;

        let updated = self.orders.set_status(&order_rid, status).await?;
        let view = self
            .orders
            .view(&order_rid)
            .await?
            .ok_or_else(|| AppError::internal("Order vanished after update"))?;

        tracing::info!(
            order_id = %updated.id_string(),
            status = %status,
            "Order status updated"
        );

        self.publish_updates(&view, true);

        Ok(view)
    }

    /// Orders visible to the caller
    ///
    /// `include_all` is the staff-side "every order" listing; customers
    /// always get just their own, newest-first.
    pub async fn list_for(&self, user: &RecordId, include_all: bool) -> AppResult<Vec<OrderView>> {
        let views = if include_all {
            self.orders.list_all().await?
        } else {
            self.orders.list_for_user(user).await?
        };
        Ok(views)
    }

    /// Fan out order:update and kitchen:update after a successful commit
    ///
    /// Fire-and-forget: the HTTP response does not wait for (or order
    /// against) websocket delivery.
    fn publish_updates(&self, view: &OrderView, with_items: bool) {
        let order_id = view.id_string();
        let status = view.status.to_string();

        self.publisher.publish(Event::OrderUpdate(OrderUpdatePayload {
            order_id: order_id.clone(),
            status: status.clone(),
            user_id: view.user.to_string(),
            total: view.total,
        }));

        let items = with_items.then(|| {
            view.items
                .iter()
                .map(|item| KitchenItem {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    notes: item.notes.clone(),
                })
                .collect()
        });
        self.publisher
            .publish(Event::KitchenUpdate(KitchenUpdatePayload {
                order_id,
                status,
                items,
            }));
    }

    /// Append the ORDER_PLACED analytics event (best-effort)
    async fn record_placed(&self, view: &OrderView) {
        let payload = serde_json::json!({
            "orderId": view.id_string(),
            "userId": view.user.to_string(),
            "total": view.total,
        });
        if let Err(e) = self.analytics.record("ORDER_PLACED", payload).await {
            tracing::warn!(error = %e, "Failed to record ORDER_PLACED event");
        }
    }
}
