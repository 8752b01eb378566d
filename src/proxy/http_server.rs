//! Forwarding proxy
//!
//! Accepts form submissions from any origin and re-posts them to the fixed
//! spreadsheet endpoint:
//! - `POST /`, `/api/proxy`, `/api/gsheet`: forward body, relay status + body
//! - `GET` on the same paths: ping the upstream and relay
//! - `OPTIONS`: CORS preflight, answered by the CORS layer
//! - `GET /health`: liveness
//!
//! Upstream bodies that are not JSON are wrapped as
//! `{ok: false, error: "Invalid JSON from upstream", raw}`.

use crate::config::ProxyConfig;
use anyhow::Context;
use axum::{
    extract::State,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Errors turned into JSON responses
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("proxy_failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::Upstream(e) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "ok": false, "error": "proxy_failed", "detail": e.to_string() })),
            )
                .into_response(),
            ProxyError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({ "ok": false, "error": "Method Not Allowed" })),
            )
                .into_response(),
        }
    }
}

/// Shared across handlers
#[derive(Clone)]
pub struct ProxyState {
    upstream_url: Arc<str>,
    http: reqwest::Client,
}

impl ProxyState {
    pub fn new(upstream_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            upstream_url: Arc::from(upstream_url),
            http,
        })
    }

    pub fn upstream_url(&self) -> &str {
        &self.upstream_url
    }
}

/// Build the proxy router
pub fn router(state: ProxyState) -> Router {
    let forward: MethodRouter<ProxyState> = post(forward_post)
        .get(forward_get)
        .fallback(method_not_allowed);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", forward.clone())
        .route("/api/proxy", forward.clone())
        .route("/api/gsheet", forward)
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Bind and serve until Ctrl+C / SIGTERM
pub async fn start_server(config: &ProxyConfig) -> anyhow::Result<()> {
    let state = ProxyState::new(&config.upstream_url, config.timeout())?;
    let address = format!("{}:{}", config.bind, config.port);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(%address, upstream = %config.upstream_url, "proxy listening");

    serve(listener, state).await
}

/// Serve on an already bound listener
pub async fn serve(listener: TcpListener, state: ProxyState) -> anyhow::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Proxy server failed")?;

    info!("proxy stopped");
    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn method_not_allowed() -> ProxyError {
    ProxyError::MethodNotAllowed
}

async fn forward_post(State(state): State<ProxyState>, body: String) -> Result<Response, ProxyError> {
    let body = if body.trim().is_empty() {
        "{}".to_string()
    } else {
        body
    };

    // text/plain keeps Apps Script from requiring its own preflight
    let upstream = state
        .http
        .post(state.upstream_url())
        .header(CONTENT_TYPE, "text/plain;charset=utf-8")
        .header(ACCEPT, "application/json")
        .body(body)
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "upstream POST failed");
            ProxyError::Upstream(e)
        })?;

    relay(upstream).await
}

async fn forward_get(State(state): State<ProxyState>) -> Result<Response, ProxyError> {
    let upstream = state
        .http
        .get(state.upstream_url())
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "upstream GET failed");
            ProxyError::Upstream(e)
        })?;

    relay(upstream).await
}

/// Pass the upstream status through with a JSON body
async fn relay(upstream: reqwest::Response) -> Result<Response, ProxyError> {
    let status = upstream.status();
    let raw = upstream.text().await?;

    let body = match serde_json::from_str::<Value>(&raw) {
        Ok(value) => value,
        Err(_) => {
            warn!(%status, bytes = raw.len(), "upstream replied with non-JSON body");
            json!({ "ok": false, "error": "Invalid JSON from upstream", "raw": raw })
        }
    };

    Ok((status, Json(body)).into_response())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
