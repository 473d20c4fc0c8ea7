//! Menu API 模块
//!
//! 公开接口，匿名可访问。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/categories", get(handler::list_categories))
        .route("/items", get(handler::list_items))
        .route("/items/{id}", get(handler::get_item))
}
