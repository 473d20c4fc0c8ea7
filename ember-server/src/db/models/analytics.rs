//! Analytics Event Model
//!
//! Append-only log entries: written once, read by the admin dashboards.
//! The payload is opaque JSON; readers decide what to make of it.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Analytics event ID type
pub type AnalyticsEventId = RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AnalyticsEventId>,
    /// Event type, e.g. "ORDER_PLACED"
    #[serde(rename = "type")]
    pub event_type: String,
    /// Opaque payload
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub created_at: i64,
}
