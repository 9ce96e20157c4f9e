//! Story transcript entries and the structured model response.

use serde::{Deserialize, Serialize};

/// One entry in a story transcript.
///
/// Either a narrative paragraph (normally with an illustration) or an echo of
/// the choice the reader selected. Entries are never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPart {
    /// The paragraph or choice echo text.
    pub text: String,
    /// Illustration shown above the text (data URI or remote URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Whether this entry records a reader choice.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_choice: bool,
}

impl StoryPart {
    /// Creates a narrative entry with its illustration.
    #[must_use]
    pub fn narrative(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_url: Some(image_url.into()),
            is_choice: false,
        }
    }

    /// Creates the echo entry for a selected choice.
    #[must_use]
    pub fn choice_echo(choice: &str) -> Self {
        Self {
            text: format!("> Você escolheu: {choice}"),
            image_url: None,
            is_choice: true,
        }
    }
}

/// The structured object the text model is asked to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryResponse {
    /// The next paragraph of the story.
    pub story: String,
    /// Candidate next actions offered to the reader.
    pub choices: Vec<String>,
}
