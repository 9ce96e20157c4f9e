//! Test backends — mock `GenerationBackend` implementations for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use panelcraft_core::error::StoryError;
use panelcraft_core::generation::{
    GenerationBackend, GenerationReply, ImageGenerationRequest, TextGenerationRequest,
};

/// A successful text reply carrying a direct `{story, choices}` body.
#[must_use]
pub fn story_reply(story: &str, choices: &[&str]) -> GenerationReply {
    GenerationReply {
        status: 200,
        body: serde_json::json!({ "story": story, "choices": choices }),
    }
}

/// A successful image reply in the `generatedImages` shape.
#[must_use]
pub fn image_reply(image_bytes: &str) -> GenerationReply {
    GenerationReply {
        status: 200,
        body: serde_json::json!({
            "generatedImages": [{ "image": { "imageBytes": image_bytes } }]
        }),
    }
}

/// A backend that answers from queued replies and records every request.
///
/// Text and image calls consume their own queues in order, optionally after
/// a fixed delay. A call against an empty queue fails with an upstream error,
/// so a test that scripts fewer replies than the code under test needs fails
/// loudly.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    text_replies: Mutex<VecDeque<Result<GenerationReply, StoryError>>>,
    image_replies: Mutex<VecDeque<Result<GenerationReply, StoryError>>>,
    text_requests: Mutex<Vec<TextGenerationRequest>>,
    image_requests: Mutex<Vec<ImageGenerationRequest>>,
    delay: Option<Duration>,
}

impl ScriptedBackend {
    /// Create a backend with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next text reply.
    #[must_use]
    pub fn with_text(self, reply: Result<GenerationReply, StoryError>) -> Self {
        self.text_replies.lock().unwrap().push_back(reply);
        self
    }

    /// Queue the next image reply.
    #[must_use]
    pub fn with_image(self, reply: Result<GenerationReply, StoryError>) -> Self {
        self.image_replies.lock().unwrap().push_back(reply);
        self
    }

    /// Make every call wait `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Wait out the configured delay, if any.
    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Queue one successful story turn: a text reply and an image reply.
    #[must_use]
    pub fn with_turn(self, story: &str, choices: &[&str], image_bytes: &str) -> Self {
        self.with_text(Ok(story_reply(story, choices)))
            .with_image(Ok(image_reply(image_bytes)))
    }

    /// Returns a snapshot of every text request received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn text_requests(&self) -> Vec<TextGenerationRequest> {
        self.text_requests.lock().unwrap().clone()
    }

    /// Returns a snapshot of every image request received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn image_requests(&self) -> Vec<ImageGenerationRequest> {
        self.image_requests.lock().unwrap().clone()
    }
}

fn exhausted() -> Result<GenerationReply, StoryError> {
    Err(StoryError::Upstream {
        status: 500,
        message: "no scripted reply left".into(),
    })
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<GenerationReply, StoryError> {
        self.text_requests.lock().unwrap().push(request.clone());
        self.pause().await;
        self.text_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(exhausted)
    }

    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<GenerationReply, StoryError> {
        self.image_requests.lock().unwrap().push(request.clone());
        self.pause().await;
        self.image_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(exhausted)
    }
}

/// A backend whose every call fails as if the upstream were unreachable.
/// Useful for testing error-handling paths.
#[derive(Debug)]
pub struct FailingBackend;

#[async_trait]
impl GenerationBackend for FailingBackend {
    async fn generate_text(
        &self,
        _request: &TextGenerationRequest,
    ) -> Result<GenerationReply, StoryError> {
        Err(StoryError::Upstream {
            status: 500,
            message: "connection refused".into(),
        })
    }

    async fn generate_image(
        &self,
        _request: &ImageGenerationRequest,
    ) -> Result<GenerationReply, StoryError> {
        Err(StoryError::Upstream {
            status: 500,
            message: "connection refused".into(),
        })
    }
}
