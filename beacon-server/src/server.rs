use crate::config::ServerConfig;
use crate::signaling::{SignalingService, create_room, ice_servers, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use std::future::Future;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// HTTP surface of the relay. Browsers call it cross-origin, so CORS is wide open.
pub fn app(service: SignalingService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/room", post(create_room))
        .route("/ws", get(ws_handler))
        .route("/ice-servers", get(ice_servers))
        .layer(cors)
        .with_state(service)
}

/// Binds `config.bind` and serves until `shutdown` resolves.
pub async fn serve<F>(config: ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let service = SignalingService::new(config.ice_servers);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!(
        "Signaling server listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Signaling server stopped unexpectedly")?;

    info!("Signaling server shut down");
    Ok(())
}
