//! Auth API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::middleware::require_auth;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    let public = Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login));

    let protected = Router::new()
        .route("/me", get(handler::me))
        .route_layer(middleware::from_fn(require_auth));

    public.merge(protected)
}
