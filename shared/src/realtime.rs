//! Real-time event types
//!
//! Payloads pushed from the server to websocket subscribers, shared so
//! clients can deserialize them without redeclaring the wire shape.
//!
//! Two logical event kinds exist:
//!
//! | Event | Topic | Audience |
//! |-------|-------|----------|
//! | `order:update` | `orders:{user_id}` | the order owner |
//! | `kitchen:update` | `station:{station}` | kitchen staff displays |
//!
//! Delivery is at-most-once: events published while no subscriber is
//! connected are dropped, and late subscribers receive no history.

use serde::{Deserialize, Serialize};

// ==================== Event Names ====================

/// Server-pushed event carrying an [`OrderUpdatePayload`]
pub const ORDER_UPDATE: &str = "order:update";

/// Server-pushed event carrying a [`KitchenUpdatePayload`]
pub const KITCHEN_UPDATE: &str = "kitchen:update";

/// Client-emitted event to join a kitchen station topic
pub const KITCHEN_SUBSCRIBE: &str = "kitchen:subscribe";

/// Client-emitted event to join a personal order topic
pub const ORDERS_SUBSCRIBE: &str = "orders:subscribe";

// ==================== Payloads ====================

/// Pushed to the order owner's personal channel on every order change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdatePayload {
    pub order_id: String,
    pub status: String,
    pub user_id: String,
    pub total: f64,
}

/// A single order line as shown on kitchen displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenItem {
    pub name: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Pushed to kitchen station channels on order creation and status change
///
/// `items` is only populated on status changes, mirroring what staff
/// displays need to re-render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenUpdatePayload {
    pub order_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<KitchenItem>>,
}

// ==================== Bus Event ====================

/// An event travelling through the in-process notification bus
///
/// The bus itself is topic-agnostic; [`Event::topic`] is what the websocket
/// layer uses to pick the destination room(s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Event {
    OrderUpdate(OrderUpdatePayload),
    KitchenUpdate(KitchenUpdatePayload),
}

impl Event {
    /// Wire event name for the websocket channel
    pub fn name(&self) -> &'static str {
        match self {
            Event::OrderUpdate(_) => ORDER_UPDATE,
            Event::KitchenUpdate(_) => KITCHEN_UPDATE,
        }
    }

    /// Topic the event is routed to
    ///
    /// Kitchen updates have no single topic — they fan out to every
    /// station room — so only order updates return one.
    pub fn topic(&self) -> Option<String> {
        match self {
            Event::OrderUpdate(p) => Some(order_topic(&p.user_id)),
            Event::KitchenUpdate(_) => None,
        }
    }
}

/// Room key for a user's personal order channel
pub fn order_topic(user_id: &str) -> String {
    format!("orders:{user_id}")
}

/// Room key for a kitchen station channel
///
/// Stations are arbitrary client-chosen grouping keys; no validation that
/// the station exists is performed anywhere.
pub fn station_topic(station: &str) -> String {
    format!("station:{station}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_and_topics() {
        let order = Event::OrderUpdate(OrderUpdatePayload {
            order_id: "order:1".into(),
            status: "PENDING".into(),
            user_id: "user:9".into(),
            total: 25.0,
        });
        assert_eq!(order.name(), ORDER_UPDATE);
        assert_eq!(order.topic().as_deref(), Some("orders:user:9"));

        let kitchen = Event::KitchenUpdate(KitchenUpdatePayload {
            order_id: "order:1".into(),
            status: "READY".into(),
            items: None,
        });
        assert_eq!(kitchen.name(), KITCHEN_UPDATE);
        assert_eq!(kitchen.topic(), None);
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload = OrderUpdatePayload {
            order_id: "order:1".into(),
            status: "PENDING".into(),
            user_id: "user:9".into(),
            total: 25.0,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["orderId"], "order:1");
        assert_eq!(json["userId"], "user:9");
        assert_eq!(json["total"], 25.0);
    }
}
