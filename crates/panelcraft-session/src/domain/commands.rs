//! Commands for the story session.

use uuid::Uuid;

/// Command to (re)start the story from the seed scene.
#[derive(Debug, Clone)]
pub struct StartStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// Command to pick one of the offered choices.
#[derive(Debug, Clone)]
pub struct SelectChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Zero-based index into the offered choices.
    pub choice_index: usize,
}
