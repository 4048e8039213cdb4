//! HTTP server for the document Q&A system

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::Result;
use state::AppState;

/// Document Q&A HTTP server
pub struct DocChatServer {
    config: RagConfig,
    state: AppState,
}

impl DocChatServer {
    /// Create a new server
    pub fn new(config: RagConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Build the router with all routes
    fn build_router(&self) -> Router {
        // CORS layer - must be added first (outermost)
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(root))
            .route("/health", get(health_check))
            .merge(routes::api_routes(self.config.server.max_upload_size))
            .with_state(self.state.clone())
            // Middleware layers (order matters - applied bottom to top)
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors)
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| crate::error::Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.build_router();

        tracing::info!("Starting document Q&A server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| crate::error::Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Root status endpoint
async fn root() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "docchat",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}
