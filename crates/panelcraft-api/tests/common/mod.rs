//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use panelcraft_core::generation::GenerationBackend;
use panelcraft_proxy::{ProxyConfig, UpstreamProxy};
use panelcraft_session::application::query_handlers;
use panelcraft_story::application::story_service::{StoryService, StoryServiceConfig};
use tower::ServiceExt;

use panelcraft_api::state::AppState;

/// Build application state whose story turns run against `backend` and whose
/// proxy endpoints forward with `proxy_config`.
pub fn test_state(backend: Arc<dyn GenerationBackend>, proxy_config: ProxyConfig) -> AppState {
    let story_service = StoryService::new(backend, StoryServiceConfig::default());
    AppState::new(UpstreamProxy::new(proxy_config), story_service)
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    panelcraft_api::app(state)
}

/// Waits until the session leaves the loading phase.
///
/// # Panics
///
/// Panics if the session is still loading after two seconds.
pub async fn wait_until_settled(state: &AppState) {
    for _ in 0..200 {
        if !query_handlers::get_session_view(&state.session).is_loading() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session still loading");
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response body as text.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

/// Send a POST request with a form body and return the status and
/// `Location` header.
pub async fn post_form(app: Router, uri: &str, form: &str) -> (StatusCode, Option<String>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_owned()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_owned());

    (response.status(), location)
}
