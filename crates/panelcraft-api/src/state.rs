//! Shared application state.

use std::sync::{Arc, Mutex};

use panelcraft_core::error::StoryError;
use panelcraft_core::generation::GenerationBackend;
use panelcraft_proxy::UpstreamProxy;
use panelcraft_session::application::command_handlers;
use panelcraft_session::domain::seed::StorySeed;
use panelcraft_session::domain::session::StorySession;
use panelcraft_session::domain::turn::TurnRequest;
use panelcraft_story::application::story_service::StoryService;
use tokio::task::JoinHandle;
use tracing::{Instrument, warn};

use crate::config::AppConfig;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Forwarder behind the `/api/proxy` endpoints.
    pub proxy: UpstreamProxy,
    /// Story generation service used by session turns.
    pub story_service: StoryService,
    /// The single in-memory story session.
    pub session: Arc<Mutex<StorySession>>,
}

impl AppState {
    /// Create new application state with a fresh session.
    #[must_use]
    pub fn new(proxy: UpstreamProxy, story_service: StoryService) -> Self {
        Self {
            proxy,
            story_service,
            session: Arc::new(Mutex::new(StorySession::new(StorySeed::default()))),
        }
    }

    /// Builds state from configuration; the story service generates through
    /// the same upstream proxy the HTTP endpoints expose.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let proxy = UpstreamProxy::new(config.proxy.clone());
        let backend: Arc<dyn GenerationBackend> = Arc::new(proxy.clone());
        let story_service = StoryService::new(backend, config.story.clone());
        Self::new(proxy, story_service)
    }

    /// Finishes a begun turn on its own task.
    ///
    /// The turn runs to completion even if the caller stops waiting, so the
    /// session always leaves the loading phase.
    pub fn spawn_turn(&self, request: TurnRequest) -> JoinHandle<Result<(), StoryError>> {
        let session = Arc::clone(&self.session);
        let service = self.story_service.clone();

        tokio::spawn(
            async move {
                let result = command_handlers::finish_turn(&session, &service, request).await;
                if let Err(e) = &result {
                    warn!(error = %e, "story turn could not be applied");
                }
                result
            }
            .in_current_span(),
        )
    }
}
