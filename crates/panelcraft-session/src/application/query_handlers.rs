//! Query handlers for the story session.
//!
//! Returns a read-only snapshot of the session for rendering.

use std::sync::Mutex;

use panelcraft_core::story::StoryPart;
use serde::Serialize;

use crate::application::command_handlers::lock;
use crate::domain::session::{SessionPhase, StorySession};

/// Read-only view of the story session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    /// Phase name: `idle`, `loading`, `awaiting_choice` or `error`.
    pub phase: &'static str,
    /// Every transcript entry in order.
    pub transcript: Vec<StoryPart>,
    /// Offered choices; empty unless awaiting a choice.
    pub choices: Vec<String>,
    /// Reader-facing error message, if the last turn failed.
    pub error: Option<String>,
}

impl SessionView {
    /// Whether a turn is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading.name()
    }
}

/// Snapshots the session.
#[must_use]
pub fn get_session_view(session: &Mutex<StorySession>) -> SessionView {
    let session = lock(session);
    SessionView {
        phase: session.phase().name(),
        transcript: session.transcript().parts().to_vec(),
        choices: session.choices().to_vec(),
        error: session.error().map(str::to_owned),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::application::query_handlers::get_session_view;
    use crate::domain::seed::{SEED_SCENE, StorySeed};
    use crate::domain::session::StorySession;
    use crate::domain::turn::StoryTurn;

    #[test]
    fn test_get_session_view_of_idle_session_is_empty() {
        let session = Mutex::new(StorySession::new(StorySeed::default()));

        let view = get_session_view(&session);

        assert_eq!(view.phase, "idle");
        assert!(view.transcript.is_empty());
        assert!(view.choices.is_empty());
        assert!(view.error.is_none());
        assert!(!view.is_loading());
    }

    #[test]
    fn test_get_session_view_reflects_awaiting_choice() {
        // Arrange
        let mut inner = StorySession::new(StorySeed::default());
        inner.begin_start().unwrap();
        inner
            .complete_turn(Ok(StoryTurn {
                story: "Abertura.".into(),
                choices: vec!["A".into(), "B".into(), "C".into()],
                image_url: "data:image/jpeg;base64,QQ==".into(),
            }))
            .unwrap();
        let session = Mutex::new(inner);

        // Act
        let view = get_session_view(&session);

        // Assert
        assert_eq!(view.phase, "awaiting_choice");
        assert_eq!(view.transcript.len(), 2);
        assert_eq!(view.transcript[0].text, SEED_SCENE);
        assert_eq!(view.choices, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_session_view_serializes_transcript_in_camel_case() {
        let mut inner = StorySession::new(StorySeed::default());
        inner.begin_start().unwrap();
        let session = Mutex::new(inner);

        let json = serde_json::to_value(get_session_view(&session)).unwrap();

        assert_eq!(json["phase"], "loading");
        assert!(json["transcript"][0]["imageUrl"].is_string());
        assert_eq!(json["choices"], serde_json::json!([]));
        assert!(json["error"].is_null());
    }
}
