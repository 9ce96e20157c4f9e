//! Story turns: what a turn asks for and what it produces.

use panelcraft_core::error::StoryError;

/// Shown when generating the paragraph or choices fails.
pub const STORY_FAILURE_MESSAGE: &str =
    "Falha ao gerar a história. Verifique o proxy e a chave do servidor.";

/// Shown when generating the illustration fails.
pub const IMAGE_FAILURE_MESSAGE: &str =
    "Falha ao gerar a imagem da história. Verifique o proxy e a chave do servidor.";

/// The generation work a turn has to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnRequest {
    /// Open the story from a seed scene.
    Start {
        /// Seed scene description.
        seed_scene: String,
    },
    /// Continue the story from the full transcript.
    Continue {
        /// Every transcript text so far, in order.
        history: Vec<String>,
    },
}

/// The outcome of a successful turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryTurn {
    /// The new paragraph.
    pub story: String,
    /// The new choice set.
    pub choices: Vec<String>,
    /// Illustration of the new paragraph.
    pub image_url: String,
}

/// Which half of a turn failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    /// Paragraph and choices.
    Story,
    /// Illustration.
    Image,
}

impl TurnStage {
    /// Reader-facing message for a failure at this stage.
    #[must_use]
    pub fn user_message(self) -> &'static str {
        match self {
            Self::Story => STORY_FAILURE_MESSAGE,
            Self::Image => IMAGE_FAILURE_MESSAGE,
        }
    }
}

/// A failed turn.
#[derive(Debug)]
pub struct TurnFailure {
    /// Where the turn failed.
    pub stage: TurnStage,
    /// The underlying error.
    pub error: StoryError,
}
