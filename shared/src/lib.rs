//! Shared types for the Ember ordering platform
//!
//! Common types used by the server and its clients: auth/session DTOs and
//! the real-time event payloads pushed over the websocket channel.

pub mod client;
pub mod realtime;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use realtime::{Event, KitchenUpdatePayload, OrderUpdatePayload};
