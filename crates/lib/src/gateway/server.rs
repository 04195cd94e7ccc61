//! Gateway HTTP server: health probe and the Webex webhook endpoint.

use crate::commands::default_registry;
use crate::config::{self, Config};
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::init;
use crate::webex::{WebexClient, Webhook, WebhookPayload};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared state for the gateway (config and the dispatcher).
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the router: `GET /` health and `POST {webhookPath}` deliveries.
pub fn router(state: GatewayState) -> Router {
    let webhook_path = config::normalize_path(&state.config.gateway.webhook_path);
    Router::new()
        .route("/", get(health_http))
        .route(&webhook_path, post(webex_webhook))
        .with_state(state)
}

pub async fn run_gateway(config: Config, config_path: PathBuf) -> Result<()> {
    init::require_initialized(&config_path)?;
    let token = config::resolve_bot_token(&config).context(
        "bot access token not configured (set webex.botToken or BOT_ACCESS_TOKEN)",
    )?;
    let client = WebexClient::new(token, Some(config::resolve_api_base_url(&config)));

    let registry = Arc::new(default_registry());
    log::info!("registered {} command(s)", registry.len());
    let dispatcher = Arc::new(Dispatcher::new(registry, Arc::new(client.clone())));
    match dispatcher.refresh_identity().await {
        Ok(email) => log::info!("connected to webex as {}", email),
        Err(e) => log::warn!("bot identity lookup failed, will retry on first message: {}", e),
    }

    let registered_webhook = match config::resolve_webhook_url(&config) {
        Some(url) => match client.register_webhook(&config.webex.webhook_name, &url).await {
            Ok(webhook) => {
                log::info!("webhook registered: {} -> {}", webhook.id, webhook.target_url);
                Some(webhook)
            }
            Err(e) => {
                log::warn!("webhook registration failed: {}", e);
                None
            }
        },
        None => {
            log::info!("no public webhook url configured; skipping webhook registration");
            None
        }
    };

    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let state = GatewayState {
        config: Arc::new(config),
        dispatcher,
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(client, registered_webhook))
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
/// Removes the webhook registered at startup so Webex stops delivering to a dead endpoint.
async fn shutdown_signal(client: WebexClient, webhook: Option<Webhook>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");

    if let Some(w) = webhook {
        if let Err(e) = client.delete_webhook(&w.id).await {
            log::debug!("webhook delete on shutdown: {}", e);
        }
    }
}

/// POST {webhookPath}: runs the dispatcher and always answers 200 with the outcome JSON.
async fn webex_webhook(State(state): State<GatewayState>, body: Bytes) -> Json<DispatchOutcome> {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("webhook: undecodable body: {}", e);
            return Json(DispatchOutcome::error("Invalid webhook data"));
        }
    };
    log::info!(
        "webhook: delivery {} received",
        payload.id.as_deref().unwrap_or("-")
    );
    Json(state.dispatcher.process_webhook(&payload).await)
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.config.gateway.port,
        "commands": state.dispatcher.registry().len(),
    }))
}
