//! Panelcraft Proxy — forwards generation requests to the upstream API.
//!
//! The proxy holds the server-side credential. Callers hand it a JSON body and
//! a target; it posts the body unmodified and returns the upstream status and
//! JSON body unmodified. Transport failures and non-JSON upstream bodies are
//! reported as errors for the caller to turn into a 500.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use panelcraft_core::error::StoryError;
use panelcraft_core::generation::{
    GenerationBackend, GenerationReply, ImageGenerationRequest, TextGenerationRequest,
};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument};

/// Default upstream URL for text generation.
pub const DEFAULT_TEXT_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Default upstream URL for image generation.
pub const DEFAULT_IMAGE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/imagen-4.0-generate-001:predict";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Errors produced while forwarding a request upstream.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No credential was configured for the server.
    #[error("API key not configured on the server")]
    MissingCredential,

    /// The upstream could not be reached or the exchange broke off.
    #[error("{0}")]
    Transport(String),

    /// The upstream answered with a body that is not JSON.
    #[error("upstream returned a non-JSON body: {0}")]
    InvalidBody(String),
}

impl From<ProxyError> for StoryError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::MissingCredential => StoryError::Configuration(err.to_string()),
            ProxyError::Transport(_) | ProxyError::InvalidBody(_) => StoryError::Upstream {
                status: 500,
                message: err.to_string(),
            },
        }
    }
}

/// Which upstream endpoint a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyTarget {
    /// Structured text generation.
    Text,
    /// Image generation.
    Image,
}

/// Upstream endpoints and credential.
#[derive(Clone)]
pub struct ProxyConfig {
    /// Credential sent upstream; `None` makes every request fail.
    pub api_key: Option<String>,
    /// Text generation endpoint.
    pub text_url: String,
    /// Image generation endpoint.
    pub image_url: String,
}

impl ProxyConfig {
    /// Creates a config pointing at the default upstream endpoints.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            text_url: DEFAULT_TEXT_URL.to_owned(),
            image_url: DEFAULT_IMAGE_URL.to_owned(),
        }
    }

    fn url_for(&self, target: ProxyTarget) -> &str {
        match target {
            ProxyTarget::Text => &self.text_url,
            ProxyTarget::Image => &self.image_url,
        }
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("text_url", &self.text_url)
            .field("image_url", &self.image_url)
            .finish()
    }
}

/// Stateless forwarder to the upstream generative API.
#[derive(Debug, Clone)]
pub struct UpstreamProxy {
    client: reqwest::Client,
    config: Arc<ProxyConfig>,
}

impl UpstreamProxy {
    /// Creates a proxy with a fresh HTTP client.
    #[must_use]
    pub fn new(config: ProxyConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Creates a proxy that shares an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: ProxyConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Posts `body` to the target's upstream URL and returns the upstream
    /// status and JSON body unmodified.
    ///
    /// # Errors
    ///
    /// Returns `ProxyError::MissingCredential` if no credential is configured,
    /// `ProxyError::Transport` if the request fails in transit, and
    /// `ProxyError::InvalidBody` if the upstream body is not JSON.
    #[instrument(skip(self, body))]
    pub async fn forward<T>(
        &self,
        target: ProxyTarget,
        body: &T,
    ) -> Result<GenerationReply, ProxyError>
    where
        T: Serialize + ?Sized + Sync,
    {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProxyError::MissingCredential)?;

        let response = self
            .client
            .post(self.config.url_for(target))
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "upstream request failed");
                ProxyError::Transport(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ProxyError::InvalidBody(e.to_string()))?;

        info!(status, "upstream responded");

        Ok(GenerationReply { status, body })
    }
}

#[async_trait]
impl GenerationBackend for UpstreamProxy {
    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<GenerationReply, StoryError> {
        Ok(self.forward(ProxyTarget::Text, request).await?)
    }

    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<GenerationReply, StoryError> {
        Ok(self.forward(ProxyTarget::Image, request).await?)
    }
}
