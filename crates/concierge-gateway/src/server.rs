// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use concierge_config::model::ServerConfig;
use concierge_core::traits::Store;
use concierge_core::ConciergeError;
use concierge_registry::ConnectionRegistry;
use concierge_scheduler::Scheduler;
use concierge_session::SessionPipeline;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Conversation pipeline for WebSocket traffic.
    pub pipeline: SessionPipeline,
    /// Persistence backend for the REST surface.
    pub store: Arc<dyn Store>,
    /// Registry of live connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Background job scheduler, for introspection and outreach.
    pub scheduler: Arc<Scheduler>,
    /// Display name reported by the health surface.
    pub agent_name: String,
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

/// Build the gateway router.
///
/// `GET /health` and the WebSocket route are public; everything under
/// `/v1` sits behind bearer auth when a token is configured.
pub fn build_router(state: GatewayState, auth: AuthConfig) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/jobs", get(handlers::get_jobs))
        .route("/v1/clients/{client_id}", get(handlers::get_client))
        .route(
            "/v1/appointments",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/v1/appointments/{appointment_id}",
            patch(handlers::patch_appointment),
        )
        .route(
            "/v1/conversations/{client_id}",
            get(handlers::list_conversations),
        )
        .route(
            "/v1/messages/{conversation_id}",
            get(handlers::list_messages),
        )
        .route("/v1/outreach/{client_id}", post(handlers::post_outreach))
        .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state.clone());

    let ws_routes = Router::new()
        .route("/ws/{client_id}", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(ws_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway server and serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), ConciergeError> {
    let auth = AuthConfig {
        bearer_token: config.bearer_token.clone(),
    };
    let app = build_router(state, auth);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ConciergeError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| ConciergeError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
