//! Server configuration read from the environment.

use panelcraft_proxy::ProxyConfig;
use panelcraft_story::application::story_service::StoryServiceConfig;

use crate::error::AppError;

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Upstream endpoints and credential.
    pub proxy: ProxyConfig,
    /// Models used in generation requests.
    pub story: StoryServiceConfig,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// A missing or empty `GEMINI_API_KEY` is not an error here; the proxy
    /// reports it on every request instead.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };

        let mut proxy = ProxyConfig::new(lookup("GEMINI_API_KEY").filter(|key| !key.is_empty()));
        if let Some(url) = lookup("TEXT_UPSTREAM_URL") {
            proxy.text_url = url;
        }
        if let Some(url) = lookup("IMAGE_UPSTREAM_URL") {
            proxy.image_url = url;
        }

        let mut story = StoryServiceConfig::default();
        if let Some(model) = lookup("STORY_TEXT_MODEL") {
            story.text_model = model;
        }
        if let Some(model) = lookup("STORY_IMAGE_MODEL") {
            story.image_model = model;
        }

        Ok(Self {
            host,
            port,
            proxy,
            story,
        })
    }
}
