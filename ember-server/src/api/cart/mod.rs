//! Cart API 模块
//!
//! 所有接口要求登录。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::middleware::require_auth;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_cart))
        .route("/items", post(handler::add_item))
        .route(
            "/items/{item_id}",
            axum::routing::patch(handler::update_item).delete(handler::remove_item),
        )
        .route("/clear", post(handler::clear))
        .route_layer(middleware::from_fn(require_auth))
}
