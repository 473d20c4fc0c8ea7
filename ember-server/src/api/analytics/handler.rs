//! Analytics API Handlers
//!
//! Ordinary aggregation over orders and the append-only event log. All
//! dollar figures go through Decimal before serialization.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::AnalyticsEvent;
use crate::orders::money;
use crate::utils::time::day_key;
use crate::utils::{AppResult, time::now_millis};

const DAY_MS: i64 = 86_400_000;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    pub id: Option<String>,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub orders_count: i64,
    pub total_revenue: f64,
    pub top_items: Vec<TopItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_sales: f64,
    pub total_orders: usize,
    pub average_order_value: f64,
}

#[derive(Debug, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub sales: f64,
}

#[derive(Debug, Serialize)]
pub struct StatusSlice {
    pub status: String,
    pub value: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingItem {
    pub id: Option<String>,
    pub name: String,
    pub sales: i64,
    pub revenue: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub title: String,
    pub description: String,
    pub timestamp: i64,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub summary: DashboardSummary,
    pub sales_trend: Vec<TrendPoint>,
    pub order_status_distribution: Vec<StatusSlice>,
    pub top_selling_items: Vec<TopSellingItem>,
    pub recent_activity: Vec<ActivityEntry>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<AnalyticsEvent>,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub range: Option<String>,
}

/// Map the range keyword to a look-back window in days (default: week)
fn range_days(range: Option<&str>) -> i64 {
    match range.unwrap_or("week") {
        "day" => 1,
        "month" => 30,
        "year" => 365,
        _ => 7,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/analytics/summary
pub async fn summary(State(state): State<ServerState>) -> AppResult<Json<SummaryResponse>> {
    let analytics = state.analytics_repository();

    let orders_count = analytics.orders_count().await?;
    let total_revenue = analytics.total_revenue().await?;
    let top_items = analytics
        .top_items(None, 5)
        .await?
        .into_iter()
        .map(|row| TopItem {
            id: row.menu_item.map(|id| id.to_string()),
            name: row.name,
            quantity: row.quantity,
        })
        .collect();

    Ok(Json(SummaryResponse {
        orders_count,
        total_revenue,
        top_items,
    }))
}

/// GET /api/analytics/dashboard?range=day|week|month|year
pub async fn dashboard(
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let analytics = state.analytics_repository();
    let since = now_millis() - range_days(query.range.as_deref()) * DAY_MS;

    let orders = analytics.orders_since(since).await?;

    // Summary block
    let total_sales: Decimal = orders.iter().map(|o| money::dec(o.total)).sum();
    let average = if orders.is_empty() {
        Decimal::ZERO
    } else {
        total_sales / Decimal::from(orders.len() as i64)
    };
    let summary = DashboardSummary {
        total_sales: money::round_money(total_sales).to_f64().unwrap_or(0.0),
        total_orders: orders.len(),
        average_order_value: money::round_money(average).to_f64().unwrap_or(0.0),
    };

    // Daily sales trend (BTreeMap keeps the dates sorted)
    let mut trend: BTreeMap<String, Decimal> = BTreeMap::new();
    for order in &orders {
        *trend.entry(day_key(order.created_at)).or_default() += money::dec(order.total);
    }
    let sales_trend = trend
        .into_iter()
        .map(|(date, sales)| TrendPoint {
            date,
            sales: money::round_money(sales).to_f64().unwrap_or(0.0),
        })
        .collect();

    // Status distribution
    let mut distribution: BTreeMap<String, i64> = BTreeMap::new();
    for order in &orders {
        *distribution.entry(order.status.to_string()).or_default() += 1;
    }
    let order_status_distribution = distribution
        .into_iter()
        .map(|(status, value)| StatusSlice { status, value })
        .collect();

    // Top sellers in the window, revenue at live menu prices
    let menu = state.menu_repository();
    let mut top_selling_items = Vec::new();
    for row in analytics.top_items(Some(since), 5).await? {
        let price = match &row.menu_item {
            Some(id) => menu
                .find_item(&id.to_string())
                .await?
                .map(|item| item.price)
                .unwrap_or(0.0),
            None => 0.0,
        };
        let revenue = money::round_money(money::line_total(price, row.quantity))
            .to_f64()
            .unwrap_or(0.0);
        top_selling_items.push(TopSellingItem {
            id: row.menu_item.map(|id| id.to_string()),
            name: row.name,
            sales: row.quantity,
            revenue,
        });
    }

    // Recent activity: latest orders merged with latest analytics events
    let mut recent_activity: Vec<ActivityEntry> = orders
        .iter()
        .rev()
        .take(5)
        .map(|order| {
            let id = order.id_string();
            let short = id.strip_prefix("order:").unwrap_or(&id);
            let short = &short[..short.len().min(6)];
            ActivityEntry {
                id: id.clone(),
                entry_type: "order".to_string(),
                title: format!("Order #{} {}", short, order.status.to_string().to_lowercase()),
                description: format!("${:.2}", order.total),
                timestamp: order.created_at,
                status: order.status.to_string().to_lowercase(),
            }
        })
        .collect();

    for event in analytics.recent_events(5).await? {
        recent_activity.push(ActivityEntry {
            id: event.id.map(|id| id.to_string()).unwrap_or_default(),
            entry_type: event.event_type.to_lowercase(),
            title: event.event_type.replace('_', " "),
            description: event.data.to_string(),
            timestamp: event.created_at,
            status: "info".to_string(),
        });
    }

    recent_activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    recent_activity.truncate(5);

    Ok(Json(DashboardResponse {
        summary,
        sales_trend,
        order_status_distribution,
        top_selling_items,
        recent_activity,
    }))
}

/// GET /api/analytics/events - Latest 50 log entries
pub async fn events(State(state): State<ServerState>) -> AppResult<Json<EventsResponse>> {
    let events = state.analytics_repository().recent_events(50).await?;
    Ok(Json(EventsResponse { events }))
}
