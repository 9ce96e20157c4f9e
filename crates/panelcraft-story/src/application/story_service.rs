//! The story service: start, continue and illustrate.
//!
//! Each operation assembles a fixed-template prompt, sends it through the
//! configured `GenerationBackend`, and validates what comes back. There is no
//! retry and no streaming; a failure is returned to the caller as-is.

use std::fmt;
use std::sync::Arc;

use panelcraft_core::error::StoryError;
use panelcraft_core::generation::{
    GenerationBackend, GenerationReply, ImageGenerationConfig, ImageGenerationRequest,
    TextGenerationConfig, TextGenerationRequest,
};
use panelcraft_core::story::StoryResponse;
use tracing::{info, instrument};

use crate::domain::image::{IMAGE_MIME_TYPE, ImageReply};
use crate::domain::prompts;
use crate::domain::reply::parse_story_reply;
use crate::domain::schema::story_response_schema;

/// Default text model.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default image model.
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

/// Models and sampling settings used in generation requests.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryServiceConfig {
    /// Model named in text requests.
    pub text_model: String,
    /// Model named in image requests.
    pub image_model: String,
    /// Sampling temperature for text requests.
    pub temperature: f64,
    /// Aspect ratio of generated illustrations.
    pub aspect_ratio: String,
}

impl Default for StoryServiceConfig {
    fn default() -> Self {
        Self {
            text_model: DEFAULT_TEXT_MODEL.to_owned(),
            image_model: DEFAULT_IMAGE_MODEL.to_owned(),
            temperature: 0.8,
            aspect_ratio: "4:3".to_owned(),
        }
    }
}

/// Generates story paragraphs, choices and illustrations.
#[derive(Clone)]
pub struct StoryService {
    backend: Arc<dyn GenerationBackend>,
    config: StoryServiceConfig,
}

impl StoryService {
    /// Creates a service that sends requests through `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn GenerationBackend>, config: StoryServiceConfig) -> Self {
        Self { backend, config }
    }

    /// Opens a story from a seed scene description.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Upstream` on a failed or non-success call and
    /// `StoryError::Validation` if the reply is not a usable story.
    #[instrument(skip(self, seed_scene))]
    pub async fn start_story(&self, seed_scene: &str) -> Result<StoryResponse, StoryError> {
        self.generate_story(prompts::start_prompt(seed_scene)).await
    }

    /// Advances a story by one paragraph given every transcript text so far.
    ///
    /// # Errors
    ///
    /// Same as [`StoryService::start_story`].
    #[instrument(skip(self, history), fields(entries = history.len()))]
    pub async fn continue_story(&self, history: &[String]) -> Result<StoryResponse, StoryError> {
        self.generate_story(prompts::continue_prompt(history)).await
    }

    /// Illustrates a story paragraph and returns a displayable image URL.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Upstream` on a failed or non-success call and
    /// `StoryError::UnsupportedShape` if the reply carries no usable image.
    #[instrument(skip(self, story_text))]
    pub async fn generate_image(&self, story_text: &str) -> Result<String, StoryError> {
        let request = ImageGenerationRequest {
            model: self.config.image_model.clone(),
            prompt: prompts::image_prompt(story_text),
            config: ImageGenerationConfig {
                number_of_images: 1,
                output_mime_type: IMAGE_MIME_TYPE.to_owned(),
                aspect_ratio: self.config.aspect_ratio.clone(),
            },
        };

        let reply = ensure_success(self.backend.generate_image(&request).await?)?;
        let image = ImageReply::from_body(&reply.body)?;

        info!("illustration generated");
        Ok(image.into_url())
    }

    async fn generate_story(&self, prompt: String) -> Result<StoryResponse, StoryError> {
        let request = TextGenerationRequest {
            model: self.config.text_model.clone(),
            contents: prompt,
            config: TextGenerationConfig {
                response_mime_type: "application/json".to_owned(),
                response_schema: story_response_schema(),
                temperature: self.config.temperature,
            },
        };

        let reply = ensure_success(self.backend.generate_text(&request).await?)?;
        let response = parse_story_reply(&reply.body)?;

        info!(choices = response.choices.len(), "story paragraph generated");
        Ok(response)
    }
}

impl fmt::Debug for StoryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn ensure_success(reply: GenerationReply) -> Result<GenerationReply, StoryError> {
    if reply.is_success() {
        Ok(reply)
    } else {
        Err(StoryError::Upstream {
            status: reply.status,
            message: reply.body.to_string(),
        })
    }
}
