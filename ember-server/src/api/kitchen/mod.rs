//! Kitchen API 模块
//!
//! 员工视角的只读投影。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::middleware::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/kitchen", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/queue", get(handler::queue))
        .route("/metrics", get(handler::metrics))
        .route_layer(middleware::from_fn(require_staff))
}
