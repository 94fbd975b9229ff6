//! HTTP surface of the local A2A endpoint
//!
//! - `GET  /.well-known/agent-card.json`: agent card discovery
//! - `GET  /health`: liveness check
//! - `POST /`: JSON-RPC 2.0

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    codec::jsonrpc::JsonRpcResponse,
    protocol::{operation::AGENT_CARD_PATH, AgentCard},
    server::{card::build_agent_card, config::ServerConfig, handler, processor::AgentProcessor},
};

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<ServerConfig>,
    pub processor: Arc<dyn AgentProcessor>,
}

pub fn build_router(config: ServerConfig, processor: Arc<dyn AgentProcessor>) -> Router {
    let state = ServerState {
        config: Arc::new(config),
        processor,
    };

    Router::new()
        .route(&format!("/{}", AGENT_CARD_PATH), get(get_agent_card))
        .route("/health", get(health_check))
        .route("/", post(handle_jsonrpc))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn serve(config: ServerConfig, processor: Arc<dyn AgentProcessor>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_target())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}:{}: {}", config.host, config.port, e))?;
    let addr = listener.local_addr()?;
    let public_url = config.public_url();
    let name = config.name.clone();
    let app = build_router(config, processor);

    tracing::info!(agent = %name, %addr, "A2A server listening");
    tracing::info!("   Agent Card: {}/{}", public_url.trim_end_matches('/'), AGENT_CARD_PATH);
    tracing::info!("   JSON-RPC:   {}/", public_url.trim_end_matches('/'));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("A2A server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
    }
}

async fn get_agent_card(State(state): State<ServerState>) -> Json<AgentCard> {
    Json(build_agent_card(&state.config))
}

async fn health_check(State(state): State<ServerState>) -> Json<Value> {
    Json(json!({"status": "healthy", "agent": state.config.name}))
}

/// JSON-RPC errors travel in the body, the status is always 200.
async fn handle_jsonrpc(State(state): State<ServerState>, body: Bytes) -> Json<JsonRpcResponse> {
    Json(handler::dispatch(&body, state.processor).await)
}
