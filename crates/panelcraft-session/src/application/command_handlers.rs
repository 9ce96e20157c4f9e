//! Command handlers for the story session.
//!
//! A turn runs in three steps: begin (lock the session, validate the action,
//! transition to loading), generate (story text, then illustration, with the
//! session unlocked), and complete (lock again and apply the outcome). The
//! session lock is never held across a generation call.

use std::sync::{Mutex, MutexGuard, PoisonError};

use panelcraft_core::error::StoryError;
use panelcraft_story::application::story_service::StoryService;
use tracing::{info, instrument, warn};

use crate::domain::commands::{SelectChoice, StartStory};
use crate::domain::session::StorySession;
use crate::domain::turn::{StoryTurn, TurnFailure, TurnRequest, TurnStage};

pub(crate) fn lock(session: &Mutex<StorySession>) -> MutexGuard<'_, StorySession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Validates a `StartStory` command and moves the session to loading.
///
/// # Errors
///
/// Returns `StoryError::InvalidTransition` while a turn is loading.
pub fn begin_start_story(
    command: &StartStory,
    session: &Mutex<StorySession>,
) -> Result<TurnRequest, StoryError> {
    let request = lock(session).begin_start()?;
    info!(correlation_id = %command.correlation_id, "story start accepted");
    Ok(request)
}

/// Starts the story on first display if nothing has been requested yet.
///
/// # Errors
///
/// Returns `StoryError::InvalidTransition` unless the session is idle.
pub fn begin_mount_story(
    command: &StartStory,
    session: &Mutex<StorySession>,
) -> Result<TurnRequest, StoryError> {
    let request = lock(session).begin_mount()?;
    info!(correlation_id = %command.correlation_id, "story mount accepted");
    Ok(request)
}

/// Validates a `SelectChoice` command, records the choice echo and moves the
/// session to loading.
///
/// # Errors
///
/// Returns `StoryError::InvalidTransition` unless the session is awaiting a
/// choice and `StoryError::Validation` for an out-of-range index.
pub fn begin_select_choice(
    command: &SelectChoice,
    session: &Mutex<StorySession>,
) -> Result<TurnRequest, StoryError> {
    let request = lock(session).begin_choice(command.choice_index)?;
    info!(
        correlation_id = %command.correlation_id,
        choice_index = command.choice_index,
        "choice accepted"
    );
    Ok(request)
}

/// Generates the paragraph, choices and illustration a turn asks for.
///
/// # Errors
///
/// Returns a `TurnFailure` naming the stage that failed.
pub async fn run_turn(
    request: &TurnRequest,
    service: &StoryService,
) -> Result<StoryTurn, TurnFailure> {
    let story = match request {
        TurnRequest::Start { seed_scene } => service.start_story(seed_scene).await,
        TurnRequest::Continue { history } => service.continue_story(history).await,
    }
    .map_err(|error| TurnFailure {
        stage: TurnStage::Story,
        error,
    })?;

    let image_url = service
        .generate_image(&story.story)
        .await
        .map_err(|error| TurnFailure {
            stage: TurnStage::Image,
            error,
        })?;

    Ok(StoryTurn {
        story: story.story,
        choices: story.choices,
        image_url,
    })
}

/// Runs a begun turn to completion and applies its outcome to the session.
///
/// # Errors
///
/// Returns `StoryError::InvalidTransition` if the session is no longer
/// loading when the turn finishes. Generation failures are not errors here;
/// they put the session in its error phase.
#[instrument(skip_all)]
pub async fn finish_turn(
    session: &Mutex<StorySession>,
    service: &StoryService,
    request: TurnRequest,
) -> Result<(), StoryError> {
    let outcome = run_turn(&request, service).await;

    match &outcome {
        Ok(turn) => info!(choices = turn.choices.len(), "story turn completed"),
        Err(failure) => warn!(
            stage = ?failure.stage,
            error = %failure.error,
            "story turn failed"
        ),
    }

    lock(session).complete_turn(outcome)
}

/// Handles the `StartStory` command end to end.
///
/// # Errors
///
/// Returns `StoryError::InvalidTransition` while a turn is loading.
#[instrument(skip(session, service), fields(correlation_id = %command.correlation_id))]
pub async fn handle_start_story(
    command: &StartStory,
    session: &Mutex<StorySession>,
    service: &StoryService,
) -> Result<(), StoryError> {
    let request = begin_start_story(command, session)?;
    finish_turn(session, service, request).await
}

/// Handles the `SelectChoice` command end to end.
///
/// # Errors
///
/// Same as [`begin_select_choice`].
#[instrument(skip(session, service), fields(correlation_id = %command.correlation_id))]
pub async fn handle_select_choice(
    command: &SelectChoice,
    session: &Mutex<StorySession>,
    service: &StoryService,
) -> Result<(), StoryError> {
    let request = begin_select_choice(command, session)?;
    finish_turn(session, service, request).await
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use panelcraft_core::error::StoryError;
    use panelcraft_core::generation::GenerationReply;
    use panelcraft_story::application::story_service::{StoryService, StoryServiceConfig};
    use panelcraft_test_support::{FailingBackend, ScriptedBackend, story_reply};
    use serde_json::json;
    use uuid::Uuid;

    use crate::application::command_handlers::{
        begin_mount_story, handle_select_choice, handle_start_story,
    };
    use crate::domain::commands::{SelectChoice, StartStory};
    use crate::domain::seed::{SEED_SCENE, StorySeed};
    use crate::domain::session::{SessionPhase, StorySession};
    use crate::domain::turn::{IMAGE_FAILURE_MESSAGE, STORY_FAILURE_MESSAGE};

    fn start() -> StartStory {
        StartStory {
            correlation_id: Uuid::new_v4(),
        }
    }

    fn select(choice_index: usize) -> SelectChoice {
        SelectChoice {
            correlation_id: Uuid::new_v4(),
            choice_index,
        }
    }

    fn fresh_session() -> Mutex<StorySession> {
        Mutex::new(StorySession::new(StorySeed::default()))
    }

    fn service_with(backend: Arc<ScriptedBackend>) -> StoryService {
        StoryService::new(backend, StoryServiceConfig::default())
    }

    #[tokio::test]
    async fn test_handle_start_story_appends_opening_and_choices() {
        // Arrange
        let backend = Arc::new(ScriptedBackend::new().with_turn(
            "Hulk ruge.",
            &["A", "B", "C"],
            "QQ==",
        ));
        let service = service_with(backend.clone());
        let session = fresh_session();

        // Act
        handle_start_story(&start(), &session, &service).await.unwrap();

        // Assert
        let session = session.lock().unwrap();
        assert_eq!(session.transcript().len(), 2);
        let opening = &session.transcript().parts()[1];
        assert_eq!(opening.text, "Hulk ruge.");
        assert_eq!(
            opening.image_url.as_deref(),
            Some("data:image/jpeg;base64,QQ==")
        );
        assert_eq!(session.choices(), ["A", "B", "C"]);

        let text_requests = backend.text_requests();
        assert!(text_requests[0].contents.contains(SEED_SCENE));
        let image_requests = backend.image_requests();
        assert!(image_requests[0].prompt.contains("Hulk ruge."));
    }

    #[tokio::test]
    async fn test_choice_turns_send_every_prior_text_in_order() {
        // Arrange
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_turn("Um.", &["A", "B", "C"], "QQ==")
                .with_turn("Dois.", &["D", "E", "F"], "QQ==")
                .with_turn("Três.", &["G", "H", "I"], "QQ=="),
        );
        let service = service_with(backend.clone());
        let session = fresh_session();
        handle_start_story(&start(), &session, &service).await.unwrap();

        // Act
        handle_select_choice(&select(0), &session, &service)
            .await
            .unwrap();
        handle_select_choice(&select(2), &session, &service)
            .await
            .unwrap();

        // Assert
        let requests = backend.text_requests();
        assert_eq!(requests.len(), 3);
        let last = &requests[2].contents;
        let expected = [
            SEED_SCENE,
            "Um.",
            "> Você escolheu: A",
            "Dois.",
            "> Você escolheu: F",
        ];
        let positions: Vec<usize> = expected
            .iter()
            .map(|text| last.find(text).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let session = session.lock().unwrap();
        assert_eq!(session.transcript().len(), 6);
        assert_eq!(session.choices(), ["G", "H", "I"]);
    }

    #[tokio::test]
    async fn test_missing_choices_leaves_transcript_unmodified() {
        // Arrange
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_turn("Um.", &["A", "B", "C"], "QQ==")
                .with_text(Ok(GenerationReply {
                    status: 200,
                    body: json!({ "story": "Sem escolhas." }),
                })),
        );
        let service = service_with(backend.clone());
        let session = fresh_session();
        handle_start_story(&start(), &session, &service).await.unwrap();

        // Act
        handle_select_choice(&select(1), &session, &service)
            .await
            .unwrap();

        // Assert
        let session = session.lock().unwrap();
        assert_eq!(session.transcript().len(), 3);
        assert!(session.transcript().parts()[2].is_choice);
        assert_eq!(session.error(), Some(STORY_FAILURE_MESSAGE));
        assert_eq!(backend.image_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_image_failure_fails_whole_turn() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_text(Ok(story_reply("Texto pronto.", &["A", "B", "C"])))
                .with_image(Ok(GenerationReply {
                    status: 200,
                    body: json!({}),
                })),
        );
        let service = service_with(backend);
        let session = fresh_session();

        handle_start_story(&start(), &session, &service).await.unwrap();

        let session = session.lock().unwrap();
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.error(), Some(IMAGE_FAILURE_MESSAGE));
        assert!(session.choices().is_empty());
    }

    #[tokio::test]
    async fn test_restart_after_failure_recovers() {
        // Arrange
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_text(Err(StoryError::Upstream {
                    status: 500,
                    message: "boom".into(),
                }))
                .with_turn("De novo.", &["A", "B", "C"], "QQ=="),
        );
        let service = service_with(backend);
        let session = fresh_session();
        handle_start_story(&start(), &session, &service).await.unwrap();
        assert!(session.lock().unwrap().error().is_some());

        // Act
        handle_start_story(&start(), &session, &service).await.unwrap();

        // Assert
        let session = session.lock().unwrap();
        assert!(session.error().is_none());
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript().parts()[1].text, "De novo.");
    }

    #[tokio::test]
    async fn test_failing_backend_puts_session_in_error_phase() {
        let service = StoryService::new(Arc::new(FailingBackend), StoryServiceConfig::default());
        let session = fresh_session();

        handle_start_story(&start(), &session, &service).await.unwrap();

        let session = session.lock().unwrap();
        assert_eq!(
            session.phase(),
            &SessionPhase::Error(STORY_FAILURE_MESSAGE.to_owned())
        );
    }

    #[tokio::test]
    async fn test_mount_after_story_started_leaves_story_alone() {
        // Arrange
        let backend = Arc::new(ScriptedBackend::new().with_turn(
            "Hulk ruge.",
            &["A", "B", "C"],
            "QQ==",
        ));
        let service = service_with(backend.clone());
        let session = fresh_session();
        handle_start_story(&start(), &session, &service).await.unwrap();

        // Act
        let result = begin_mount_story(&start(), &session);

        // Assert
        assert!(matches!(
            result,
            Err(StoryError::InvalidTransition {
                phase: "awaiting_choice",
                ..
            })
        ));
        let session = session.lock().unwrap();
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.choices(), ["A", "B", "C"]);
        assert_eq!(backend.text_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_select_choice_before_start_is_rejected() {
        let service = StoryService::new(Arc::new(FailingBackend), StoryServiceConfig::default());
        let session = fresh_session();

        let result = handle_select_choice(&select(0), &session, &service).await;

        assert!(matches!(
            result,
            Err(StoryError::InvalidTransition { phase: "idle", .. })
        ));
        assert!(session.lock().unwrap().transcript().is_empty());
    }
}
