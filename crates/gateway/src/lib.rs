//! Admin Gateway Library
//!
//! This crate provides the HTTP REST API of the tenant console over the
//! account service.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use account_service_lib::{ConsoleConfig, Services};

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Run the HTTP server with the given configuration.
pub async fn run_server(
    config: GatewayConfig,
    console: ConsoleConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Build the registry and services
    let services = Services::in_memory(console)?;

    let cors = cors_layer(&config)?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Create app state
    let state = AppState::new(services, config);

    // Build router
    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    info!("Admin gateway listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// CORS for the console front-end.
fn cors_layer(config: &GatewayConfig) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let layer = match &config.cors_allowed_origin {
        Some(origin) => CorsLayer::new().allow_origin(origin.parse::<HeaderValue>()?),
        None => CorsLayer::new().allow_origin(Any),
    };
    Ok(layer.allow_methods(Any).allow_headers(Any))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
