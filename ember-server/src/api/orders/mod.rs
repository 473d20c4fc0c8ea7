//! Orders API 模块
//!
//! 下单和列表要求登录；状态流转要求员工角色。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::auth::middleware::{require_auth, require_staff};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let customer = Router::new()
        .route("/", get(handler::list).post(handler::place))
        .route_layer(middleware::from_fn(require_auth));

    let staff = Router::new()
        .route("/{order_id}/status", patch(handler::set_status))
        .route_layer(middleware::from_fn(require_staff));

    customer.merge(staff)
}
