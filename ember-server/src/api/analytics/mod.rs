//! Analytics API 模块
//!
//! 管理员专用的聚合视图。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::middleware::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/analytics", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/summary", get(handler::summary))
        .route("/dashboard", get(handler::dashboard))
        .route("/events", get(handler::events))
        .route_layer(middleware::from_fn(require_admin))
}
