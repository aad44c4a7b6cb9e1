//! Axum-based HTTP server.

use std::future::Future;
use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::RpcError;
use crate::handlers;
use crate::state::AppState;
use crate::ws;

pub struct RpcServer {
    pub listen_addr: SocketAddr,
    pub expose_metrics: bool,
    state: AppState,
}

impl RpcServer {
    pub fn new(listen_addr: SocketAddr, state: AppState) -> Self {
        Self {
            listen_addr,
            expose_metrics: false,
            state,
        }
    }

    pub fn with_metrics(mut self, expose: bool) -> Self {
        self.expose_metrics = expose;
        self
    }

    pub fn router(&self) -> Router {
        router(self.state.clone(), self.expose_metrics)
    }

    /// Bind and serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn start(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<(), RpcError> {
        let listener = TcpListener::bind(self.listen_addr)
            .await
            .map_err(|e| RpcError::Internal(format!("bind {}: {e}", self.listen_addr)))?;
        self.serve(listener, shutdown).await
    }

    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RpcError> {
        let app = self.router();
        let addr = listener.local_addr().unwrap_or(self.listen_addr);
        info!(%addr, metrics = self.expose_metrics, "RPC server listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Internal(format!("server error: {e}")))?;
        info!("RPC server stopped");
        Ok(())
    }
}

/// The full route table.
pub fn router(state: AppState, expose_metrics: bool) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .route("/elections", get(handlers::list_elections))
        .route("/elections/:id/candidates", get(handlers::list_candidates))
        .route("/vote", post(handlers::cast_vote))
        .route("/vote/verify", get(handlers::verify_receipt))
        .route("/audit/logs", get(handlers::audit_logs));

    if state.feed.is_some() {
        app = app.route("/admin/feed", get(ws::admin_feed));
    }
    if expose_metrics {
        app = app.route("/metrics", get(handlers::metrics));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
