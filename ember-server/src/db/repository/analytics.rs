//! Analytics Repository
//!
//! Append-only event writer plus the aggregation reads behind the admin
//! dashboards. Nothing here mutates orders; the dashboards are pure
//! projections.

use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::serde_helpers;
use crate::db::models::{AnalyticsEvent, Order};
use crate::utils::time::now_millis;

/// Top-selling item aggregation row
#[derive(Debug, Clone, Deserialize)]
pub struct TopItemRow {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub menu_item: Option<RecordId>,
    pub name: String,
    pub quantity: i64,
}

#[derive(Clone)]
pub struct AnalyticsRepository {
    base: BaseRepository,
}

impl AnalyticsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append an event (write-once; events are never updated or deleted)
    pub async fn record(
        &self,
        event_type: &str,
        data: serde_json::Value,
    ) -> RepoResult<AnalyticsEvent> {
        let mut result = self
            .base
            .db()
            .query(
                "CREATE analytics_event SET \
                 type = $type, data = $data, created_at = $now RETURN AFTER",
            )
            .bind(("type", event_type.to_string()))
            .bind(("data", data))
            .bind(("now", now_millis()))
            .await?;
        let created: Option<AnalyticsEvent> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to record event".to_string()))
    }

    /// Latest events, newest-first
    pub async fn recent_events(&self, limit: usize) -> RepoResult<Vec<AnalyticsEvent>> {
        let events: Vec<AnalyticsEvent> = self
            .base
            .db()
            .query("SELECT * FROM analytics_event ORDER BY created_at DESC LIMIT $limit")
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(events)
    }

    /// Total number of orders ever placed
    pub async fn orders_count(&self) -> RepoResult<i64> {
        #[derive(Deserialize)]
        struct CountRow {
            count: i64,
        }
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS count FROM order GROUP ALL")
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Summed revenue over all orders
    pub async fn total_revenue(&self) -> RepoResult<f64> {
        #[derive(Deserialize)]
        struct RevenueRow {
            revenue: Option<f64>,
        }
        let mut result = self
            .base
            .db()
            .query("SELECT math::sum(total) AS revenue FROM order GROUP ALL")
            .await?;
        let rows: Vec<RevenueRow> = result.take(0)?;
        Ok(rows.first().and_then(|r| r.revenue).unwrap_or(0.0))
    }

    /// Top items by quantity sold, optionally restricted to orders created
    /// at or after `since` (millis)
    pub async fn top_items(&self, since: Option<i64>, limit: usize) -> RepoResult<Vec<TopItemRow>> {
        let sql = if since.is_some() {
            "SELECT menu_item, name, math::sum(quantity) AS quantity FROM order_item \
             WHERE order.created_at >= $since \
             GROUP BY menu_item, name ORDER BY quantity DESC LIMIT $limit"
        } else {
            "SELECT menu_item, name, math::sum(quantity) AS quantity FROM order_item \
             GROUP BY menu_item, name ORDER BY quantity DESC LIMIT $limit"
        };

        let mut query = self.base.db().query(sql).bind(("limit", limit));
        if let Some(since) = since {
            query = query.bind(("since", since));
        }

        let rows: Vec<TopItemRow> = query.await?.take(0)?;
        Ok(rows)
    }

    /// Orders created at or after `since` (millis), oldest-first
    pub async fn orders_since(&self, since: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE created_at >= $since ORDER BY created_at ASC")
            .bind(("since", since))
            .await?
            .take(0)?;
        Ok(orders)
    }
}
