//! Upstream proxy endpoints.
//!
//! Both endpoints forward the caller's JSON body unmodified and hand back the
//! upstream status and body as-is. The credential never leaves the server.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use serde_json::Value;
use tracing::{info, instrument};

use panelcraft_proxy::ProxyTarget;

use crate::error::ProxyFailure;
use crate::state::AppState;

/// POST /proxy
#[instrument(skip_all)]
async fn proxy_text(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ProxyFailure> {
    forward(&state, ProxyTarget::Text, &body).await
}

/// POST /proxy-image
#[instrument(skip_all)]
async fn proxy_image(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ProxyFailure> {
    forward(&state, ProxyTarget::Image, &body).await
}

async fn forward(
    state: &AppState,
    target: ProxyTarget,
    body: &Value,
) -> Result<(StatusCode, Json<Value>), ProxyFailure> {
    let reply = state.proxy.forward(target, body).await?;
    info!(?target, status = reply.status, "proxied generation request");

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(reply.body)))
}

/// Returns the router for the proxy endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/proxy", post(proxy_text))
        .route("/proxy-image", post(proxy_image))
}
