//! Server Implementation
//!
//! HTTP 服务器装配与启动：合并各 API 路由、挂载中间件
//! (CORS / 请求日志 / 身份注入) 和 Socket.IO 层。

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::auth::middleware::attach_auth_user;
use crate::core::{Config, ServerState};
use crate::realtime::socket;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (tests share the same state)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Assemble the router for a given state
    ///
    /// Exposed separately so tests can drive the full middleware stack
    /// without binding a port.
    pub fn build_router(state: ServerState) -> Router {
        let (socket_layer, _io) = socket::layer(&state.event_bus);

        let cors = match state.config.client_origin.as_str() {
            "*" => CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
            origin => {
                let origin = origin
                    .parse::<HeaderValue>()
                    .unwrap_or_else(|_| HeaderValue::from_static("*"));
                CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        };

        Router::new()
            .merge(api::health::router())
            .merge(api::auth::router())
            .merge(api::menu::router())
            .merge(api::cart::router())
            .merge(api::orders::router())
            .merge(api::kitchen::router())
            .merge(api::analytics::router())
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                attach_auth_user,
            ))
            .with_state(state)
            .layer(socket_layer)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        let app = Self::build_router(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("🔥 Ember Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
