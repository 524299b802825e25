use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use super::handlers;
use crate::domain::error::DomainError;
use crate::StockInsights;

/// Directory served under `/static`, relative to the working directory.
pub const STATIC_DIR: &str = "static";

pub fn build_router(app: Arc<StockInsights>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/dashboard", get(handlers::dashboard))
        .route("/portfolio", get(handlers::portfolio_page))
        .route("/health", get(handlers::health))
        .route("/query", post(handlers::run_query))
        .route("/history", get(handlers::get_history).delete(handlers::clear_history))
        .route("/portfolio-analysis", post(handlers::analyze_portfolio))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .with_state(app)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(app: Arc<StockInsights>, host: &str, port: u16) -> Result<(), DomainError> {
    let listener = bind(host, port).await?;
    axum::serve(listener, build_router(app))
        .await
        .map_err(|e| DomainError::Server(format!("Server error: {e}")))
}

/// Binds the listener, resolving `host` as a name or an address.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener, DomainError> {
    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|e| DomainError::Server(format!("Failed to bind to {host}:{port}: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| DomainError::Server(format!("Failed to read listen address: {e}")))?;
    info!("Listening on http://{addr}");
    Ok(listener)
}
