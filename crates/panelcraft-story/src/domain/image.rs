//! Normalization of image replies into a displayable URL.

use panelcraft_core::error::StoryError;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// MIME type the image requests ask for, used when wrapping raw base64.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// The accepted image reply shapes, tried in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ImageReply {
    /// `{ generatedImages: [{ image: { imageBytes } }, ...] }`; the first
    /// image wins.
    #[serde(rename_all = "camelCase")]
    GeneratedImages {
        /// The first generated image.
        #[serde(deserialize_with = "first_generated_image")]
        generated_images: GeneratedImage,
    },
    /// `{ imageBase64 }`.
    #[serde(rename_all = "camelCase")]
    Base64 {
        /// Raw base64 image bytes.
        #[serde(deserialize_with = "non_empty_string")]
        image_base64: String,
    },
    /// `{ dataUrl }`, already displayable.
    #[serde(rename_all = "camelCase")]
    DataUrl {
        /// A ready-made data URL.
        #[serde(deserialize_with = "non_empty_string")]
        data_url: String,
    },
}

/// One entry of a `generatedImages` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedImage {
    /// The encoded image.
    pub image: EncodedImage,
}

/// Base64 payload of a generated image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    /// Base64 image bytes.
    #[serde(deserialize_with = "non_empty_string")]
    pub image_bytes: String,
}

fn first_generated_image<'de, D>(deserializer: D) -> Result<GeneratedImage, D::Error>
where
    D: Deserializer<'de>,
{
    let images = Vec::<Value>::deserialize(deserializer)?;
    let first = images
        .into_iter()
        .next()
        .ok_or_else(|| de::Error::custom("generatedImages is empty"))?;
    GeneratedImage::deserialize(first).map_err(de::Error::custom)
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.is_empty() {
        return Err(de::Error::custom("empty string"));
    }
    Ok(value)
}

impl ImageReply {
    /// Matches a raw reply body against the accepted shapes.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::UnsupportedShape` if no shape matches.
    pub fn from_body(body: &Value) -> Result<Self, StoryError> {
        Self::deserialize(body).map_err(|_| StoryError::UnsupportedShape)
    }

    /// Returns the URL to render: a JPEG data URI for base64 payloads, the
    /// data URL unmodified otherwise.
    #[must_use]
    pub fn into_url(self) -> String {
        match self {
            Self::GeneratedImages { generated_images } => {
                jpeg_data_uri(&generated_images.image.image_bytes)
            }
            Self::Base64 { image_base64 } => jpeg_data_uri(&image_base64),
            Self::DataUrl { data_url } => data_url,
        }
    }
}

fn jpeg_data_uri(base64: &str) -> String {
    format!("data:{IMAGE_MIME_TYPE};base64,{base64}")
}
