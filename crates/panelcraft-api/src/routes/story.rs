//! JSON routes for the story session.
//!
//! Unlike the page routes, these await the whole turn and answer with the
//! resulting session view. The turn itself runs on a spawned task, so a
//! client that disconnects mid-turn does not leave the session loading.

use axum::extract::State;
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;
use tracing::{error, info, instrument};
use uuid::Uuid;

use panelcraft_session::application::command_handlers;
use panelcraft_session::application::query_handlers::{self, SessionView};
use panelcraft_session::domain::commands;
use panelcraft_session::domain::turn::TurnRequest;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /choices.
#[derive(Debug, Deserialize)]
pub struct SelectChoiceRequest {
    /// Index into the currently offered choices.
    pub choice_index: usize,
}

/// GET /
#[instrument(skip(state))]
async fn get_story(State(state): State<AppState>) -> Json<SessionView> {
    Json(query_handlers::get_session_view(&state.session))
}

/// POST /restart
#[instrument(skip(state))]
async fn restart_story(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let command = commands::StartStory {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling start_story command");

    let request = command_handlers::begin_start_story(&command, &state.session)?;
    await_turn(&state, request).await
}

/// POST /choices
#[instrument(skip(state, request), fields(choice_index = request.choice_index))]
async fn select_choice(
    State(state): State<AppState>,
    Json(request): Json<SelectChoiceRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let command = commands::SelectChoice {
        correlation_id: Uuid::new_v4(),
        choice_index: request.choice_index,
    };

    info!(correlation_id = %command.correlation_id, "handling select_choice command");

    let request = command_handlers::begin_select_choice(&command, &state.session)?;
    await_turn(&state, request).await
}

/// Waits for a begun turn and snapshots the session it left behind.
async fn await_turn(state: &AppState, request: TurnRequest) -> Result<Json<SessionView>, ApiError> {
    match state.spawn_turn(request).await {
        Ok(outcome) => outcome?,
        Err(e) => error!(error = %e, "story turn task did not finish"),
    }

    Ok(Json(query_handlers::get_session_view(&state.session)))
}

/// Returns the router for the story JSON API.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_story))
        .route("/restart", post(restart_story))
        .route("/choices", post(select_choice))
}
