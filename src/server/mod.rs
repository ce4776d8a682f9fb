//INFO: Server module - the remote data gateway
//NOTE: Two POST endpoints that forward a caller's token to Google and flatten the result

pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::integrations::GoogleApi;

pub use error::{ErrorBody, GatewayError};
pub use handlers::{EventsResponse, FetchRequest, MessagesResponse, DEFAULT_MAX_RESULTS};

//INFO: Shared, read-only handler state
#[derive(Clone)]
pub struct GatewayState {
    pub google: Arc<GoogleApi>,
}

impl GatewayState {
    pub fn new(google: GoogleApi) -> Self {
        Self {
            google: Arc::new(google),
        }
    }
}

//INFO: Builds the gateway router
pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/gmail", post(handlers::gmail_messages))
        .route("/api/calendar", post(handlers::calendar_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//INFO: Serves the gateway until ctrl-c
pub async fn serve(bind_address: SocketAddr, state: GatewayState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind gateway to {}", bind_address))?;
    info!("Gateway listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server failed")?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
