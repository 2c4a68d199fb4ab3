//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with all API endpoints
//! - Middleware stack (CORS, request IDs, logging, timeouts)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{
    cors, cors_allow_headers, cors_allow_methods, json_errors, log_requests, request_id,
};
use crate::routes::{contacts, health, method_not_allowed, missing_id, not_found};
use crate::state::ServerState;
use axum::http::StatusCode;
use axum::middleware::{from_fn, map_response};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// | Method | Path | Handler |
/// |---|---|---|
/// | GET | `/healthz` | liveness |
/// | GET, POST | `/contacts` | list, create |
/// | GET | `/contacts/` | list |
/// | PUT, DELETE | `/contacts/` | 400 missing id |
/// | GET, PUT, DELETE | `/contacts/{id}` | get, update, delete |
///
/// Middleware stack (outermost first):
/// 1. Tracing spans
/// 2. Request ID tracking
/// 3. Request logging
/// 4. CORS allow-methods/allow-headers on every response
/// 5. CORS, which answers every `OPTIONS` before routing
/// 6. JSON bodies for 408 and 413
/// 7. Timeout handling
pub fn build_router(state: Arc<ServerState>) -> Router {
    let timeout = state.config.timeout();

    Router::new()
        .route("/healthz", get(health::health_check))
        .route(
            "/contacts",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route(
            "/contacts/",
            get(contacts::list_contacts).put(missing_id).delete(missing_id),
        )
        .route(
            "/contacts/{id}",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(map_response(json_errors))
        .layer(cors())
        .layer(cors_allow_methods())
        .layer(cors_allow_headers())
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the contacts HTTP server
///
/// Connects the configured store, builds the router and serves until
/// SIGTERM or Ctrl+C.
///
/// # Errors
///
/// Fails without serving any traffic if the store cannot be reached, the bind
/// address is invalid, or the port cannot be bound.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        backend = ?config.backend,
        store_timeout_secs = config.store_timeout_secs,
        "Connecting contact store"
    );
    let state = ServerState::connect(config.clone())
        .await
        .map_err(|e| anyhow::anyhow!("failed to connect contact store: {e}"))?;

    let app = build_router(Arc::new(state));

    tracing::info!("Contacts API listening on {}", addr);
    tracing::info!(
        "Request timeout: {}s, store call timeout: {}s",
        config.timeout_secs,
        config.store_timeout_secs
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Install the JSON `tracing` subscriber filtered by `log_level`.
///
/// `RUST_LOG` has no effect here; the configured level is authoritative.
pub fn init_tracing(config: &ServerConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .json()
        .init();
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
