//! Kitchen API Handlers
//!
//! Read-only projections over the order table for staff displays. No
//! state of their own, everything derives from order statuses.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::{OrderStatus, OrderView};
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct QueueResponse {
    pub orders: Vec<OrderView>,
}

/// Per-status counts over the active statuses
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub pending: i64,
    pub in_progress: i64,
    pub ready: i64,
}

/// GET /api/kitchen/queue - Active orders, oldest-first
///
/// COMPLETED and CANCELLED orders never appear here.
pub async fn queue(State(state): State<ServerState>) -> AppResult<Json<QueueResponse>> {
    let orders = state.order_repository().kitchen_queue().await?;
    Ok(Json(QueueResponse { orders }))
}

/// GET /api/kitchen/metrics - Station workload counters
pub async fn metrics(State(state): State<ServerState>) -> AppResult<Json<MetricsResponse>> {
    let counts = state.order_repository().status_counts().await?;

    let mut metrics = MetricsResponse::default();
    for row in counts {
        match row.status {
            OrderStatus::Pending => metrics.pending = row.count,
            OrderStatus::InProgress => metrics.in_progress = row.count,
            OrderStatus::Ready => metrics.ready = row.count,
            // terminal statuses are filtered out by the query
            OrderStatus::Completed | OrderStatus::Cancelled => {}
        }
    }

    Ok(Json(metrics))
}
