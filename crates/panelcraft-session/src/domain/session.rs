//! The story session aggregate.

use panelcraft_core::error::StoryError;
use panelcraft_core::story::StoryPart;

use super::seed::StorySeed;
use super::turn::{StoryTurn, TurnFailure, TurnRequest};

/// Session phase state machine.
///
/// `Idle` is the state before the first start. Choosing goes straight from
/// `AwaitingChoice` to `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing has been requested yet.
    Idle,
    /// A turn is in flight; no reader action is accepted.
    Loading,
    /// The reader is choosing among these options.
    AwaitingChoice(Vec<String>),
    /// The last turn failed with this reader-facing message.
    Error(String),
}

impl SessionPhase {
    /// Short lowercase name of the phase.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::AwaitingChoice(_) => "awaiting_choice",
            Self::Error(_) => "error",
        }
    }
}

/// Append-only ordered list of transcript entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript(Vec<StoryPart>);

impl Transcript {
    /// All entries in narrative order.
    #[must_use]
    pub fn parts(&self) -> &[StoryPart] {
        &self.0
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the transcript has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every entry's text in order, choice echoes included.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.0.iter().map(|part| part.text.clone()).collect()
    }

    fn push(&mut self, part: StoryPart) {
        self.0.push(part);
    }
}

/// The aggregate root for the story session.
#[derive(Debug)]
pub struct StorySession {
    seed: StorySeed,
    transcript: Transcript,
    phase: SessionPhase,
}

impl StorySession {
    /// Creates an idle session that will start from `seed`.
    #[must_use]
    pub fn new(seed: StorySeed) -> Self {
        Self {
            seed,
            transcript: Transcript::default(),
            phase: SessionPhase::Idle,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// The transcript so far.
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Offered choices; empty unless awaiting a choice.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        match &self.phase {
            SessionPhase::AwaitingChoice(choices) => choices,
            _ => &[],
        }
    }

    /// Reader-facing error message, if the last turn failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Starts (or restarts) the story: the transcript is reset to the seed
    /// entry, choices and errors are discarded, and the session is loading.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::InvalidTransition` while a turn is loading.
    pub fn begin_start(&mut self) -> Result<TurnRequest, StoryError> {
        self.ensure_not_loading("start the story")?;

        self.transcript = Transcript::default();
        self.transcript.push(self.seed.to_part());
        self.phase = SessionPhase::Loading;

        Ok(TurnRequest::Start {
            seed_scene: self.seed.scene.clone(),
        })
    }

    /// Starts the story on first display. Unlike [`StorySession::begin_start`]
    /// this only moves out of `Idle`, so a story already under way is kept.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::InvalidTransition` unless the session is idle.
    pub fn begin_mount(&mut self) -> Result<TurnRequest, StoryError> {
        if self.phase != SessionPhase::Idle {
            return Err(StoryError::InvalidTransition {
                action: "mount the story",
                phase: self.phase.name(),
            });
        }
        self.begin_start()
    }

    /// Selects the choice at `index`: its echo is appended, the choices are
    /// cleared, and the session is loading.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::InvalidTransition` unless awaiting a choice, and
    /// `StoryError::Validation` if `index` is out of range.
    pub fn begin_choice(&mut self, index: usize) -> Result<TurnRequest, StoryError> {
        let SessionPhase::AwaitingChoice(choices) = &self.phase else {
            return Err(StoryError::InvalidTransition {
                action: "select a choice",
                phase: self.phase.name(),
            });
        };

        let choice = choices.get(index).ok_or_else(|| {
            StoryError::Validation(format!(
                "choice index {index} is out of range for {} choices",
                choices.len()
            ))
        })?;

        let echo = StoryPart::choice_echo(choice);
        self.transcript.push(echo);
        self.phase = SessionPhase::Loading;

        Ok(TurnRequest::Continue {
            history: self.transcript.texts(),
        })
    }

    /// Applies the outcome of the in-flight turn.
    ///
    /// On success the new paragraph and its illustration are appended and
    /// the new choices offered. On failure nothing is appended and the
    /// session shows the failure's reader-facing message.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::InvalidTransition` if no turn is loading.
    pub fn complete_turn(
        &mut self,
        outcome: Result<StoryTurn, TurnFailure>,
    ) -> Result<(), StoryError> {
        if self.phase != SessionPhase::Loading {
            return Err(StoryError::InvalidTransition {
                action: "complete a turn",
                phase: self.phase.name(),
            });
        }

        self.phase = match outcome {
            Ok(turn) => {
                self.transcript
                    .push(StoryPart::narrative(turn.story, turn.image_url));
                SessionPhase::AwaitingChoice(turn.choices)
            }
            Err(failure) => SessionPhase::Error(failure.stage.user_message().to_owned()),
        };
        Ok(())
    }

    fn ensure_not_loading(&self, action: &'static str) -> Result<(), StoryError> {
        if self.phase == SessionPhase::Loading {
            return Err(StoryError::InvalidTransition {
                action,
                phase: self.phase.name(),
            });
        }
        Ok(())
    }
}
