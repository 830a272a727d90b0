//! HTTP server for the browser chat surface

use crate::config::ServerConfig;
use crate::error::Result;
use crate::surface::{create_router, AppState};
use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Router with request tracing applied
pub fn create_app(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default())
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    create_router(state).layer(ServiceBuilder::new().layer(trace_layer))
}

/// Bind the configured address and serve until Ctrl+C
///
/// # Errors
///
/// Returns error if the address cannot be bound or the server fails
pub async fn run_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!("Serving {} on http://{}", config.title, local_addr);
    println!("Chat UI available at http://{}  (Ctrl+C to stop)", local_addr);

    axum::serve(listener, create_app(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
