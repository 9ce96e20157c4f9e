//! Parsing and validation of structured text replies.
//!
//! The text proxy forwards the upstream body verbatim. Depending on the
//! upstream that body is either the structured object itself or a
//! `candidates[0].content.parts[*].text` envelope whose text is the object
//! serialized as JSON. Both forms are accepted, tried in that order.

use panelcraft_core::error::StoryError;
use panelcraft_core::story::StoryResponse;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Number of choices the prompts ask for.
pub const EXPECTED_CHOICES: usize = 3;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextReply {
    Direct(StoryResponse),
    Envelope { candidates: Vec<Candidate> },
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Parses a text reply body and validates the story it carries.
///
/// Only two things are enforced: `story` is not blank and `choices` is a
/// non-empty array of non-blank strings. A choice count other than
/// [`EXPECTED_CHOICES`] is accepted and logged.
///
/// # Errors
///
/// Returns `StoryError::Validation` if the body matches neither accepted
/// form, if an envelope's text is not the structured object, or if the
/// object fails validation.
pub fn parse_story_reply(body: &Value) -> Result<StoryResponse, StoryError> {
    let reply = TextReply::deserialize(body).map_err(|_| {
        StoryError::Validation("response has neither story and choices nor candidates".into())
    })?;

    let response = match reply {
        TextReply::Direct(response) => response,
        TextReply::Envelope { candidates } => unwrap_envelope(candidates)?,
    };

    validate(response)
}

fn unwrap_envelope(candidates: Vec<Candidate>) -> Result<StoryResponse, StoryError> {
    let candidate = candidates
        .into_iter()
        .next()
        .ok_or_else(|| StoryError::Validation("response has no candidates".into()))?;

    let text: String = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    serde_json::from_str(&text).map_err(|e| {
        StoryError::Validation(format!("candidate text is not a story object: {e}"))
    })
}

fn validate(response: StoryResponse) -> Result<StoryResponse, StoryError> {
    if response.story.trim().is_empty() {
        return Err(StoryError::Validation("story is empty".into()));
    }
    if response.choices.is_empty() {
        return Err(StoryError::Validation("choices is empty".into()));
    }
    if response.choices.iter().any(|c| c.trim().is_empty()) {
        return Err(StoryError::Validation("choices contains a blank entry".into()));
    }
    if response.choices.len() != EXPECTED_CHOICES {
        warn!(
            count = response.choices.len(),
            expected = EXPECTED_CHOICES,
            "model returned an unexpected number of choices"
        );
    }
    Ok(response)
}
