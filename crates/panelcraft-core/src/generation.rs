//! Generation request wire types and the backend abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoryError;

/// Generation settings for a text request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextGenerationConfig {
    /// Always `application/json`: the model must answer with structured output.
    pub response_mime_type: String,
    /// Declarative shape of the expected JSON object.
    pub response_schema: serde_json::Value,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Body sent to the text proxy endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextGenerationRequest {
    /// Text model name.
    pub model: String,
    /// The full prompt.
    pub contents: String,
    /// Generation settings.
    pub config: TextGenerationConfig,
}

/// Generation settings for an image request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    /// How many images to generate.
    pub number_of_images: u32,
    /// Encoding of the generated images.
    pub output_mime_type: String,
    /// Aspect ratio such as `4:3`.
    pub aspect_ratio: String,
}

/// Body sent to the image proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    /// Image model name.
    pub model: String,
    /// Illustration prompt.
    pub prompt: String,
    /// Generation settings.
    pub config: ImageGenerationConfig,
}

/// A forwarded upstream answer: status code plus raw JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReply {
    /// Upstream HTTP status code.
    pub status: u16,
    /// Upstream JSON body, unmodified.
    pub body: serde_json::Value,
}

impl GenerationReply {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Backend the story service sends generation requests through.
///
/// Implementations forward requests to the generative API and hand back the
/// upstream status and body as-is; interpreting the body is the caller's job.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Forward a text generation request.
    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<GenerationReply, StoryError>;

    /// Forward an image generation request.
    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<GenerationReply, StoryError>;
}
