//! Server-rendered story page.
//!
//! `GET /` renders the session; the form endpoints begin a turn, finish it in
//! the background and redirect back to the page, which refreshes itself while
//! the turn is loading.

use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::{Form, Router, routing::get, routing::post};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use panelcraft_session::application::command_handlers;
use panelcraft_session::application::query_handlers::{self, SessionView};
use panelcraft_session::domain::commands;
use panelcraft_session::domain::turn::TurnRequest;

use crate::state::AppState;

/// Seconds between page refreshes while a turn is loading.
const REFRESH_SECONDS: u32 = 2;

const STYLE: &str = "\
body{background:#1f2937;color:#fff;font-family:sans-serif;margin:0;padding:2rem}\
main{max-width:42rem;margin:0 auto;background:#111827;border:4px solid #000;border-radius:.5rem}\
header{background:#6d28d9;border-bottom:4px solid #000;padding:1rem;text-align:center}\
h1{color:#fde047;letter-spacing:.1em;text-shadow:3px 3px 0 #000;margin:0}\
header p{color:#e9d5ff;font-weight:600}\
.log{padding:1.5rem}\
.part{margin-bottom:1.5rem}\
.part img{width:100%;border:4px solid #000;border-radius:.5rem}\
.narrative{color:#e5e7eb;line-height:1.6}\
.echo{color:#facc15;font-style:italic;font-weight:600}\
.spinner{text-align:center;color:#4ade80;font-weight:700}\
.error{background:#991b1b;border:2px solid #ef4444;border-radius:.5rem;padding:1rem}\
.choices{background:#1f2937;border-top:4px solid #000;padding:1.5rem}\
.choices h2{color:#4ade80;text-shadow:2px 2px 0 #000}\
.choice{display:block;width:100%;text-align:left;font-weight:600;background:#facc15;\
border:2px solid #000;border-radius:.5rem;padding:1rem;margin-bottom:.75rem;cursor:pointer}\
.restart{width:100%;margin-top:1rem;padding:.5rem;background:#9333ea;color:#fff;font-weight:700;\
border:0;border-radius:.375rem;cursor:pointer}";

/// Form body for POST /story/choose.
#[derive(Debug, Deserialize)]
pub struct ChooseForm {
    /// Index of the selected choice.
    pub choice: usize,
}

/// GET /
#[instrument(skip(state))]
async fn index(State(state): State<AppState>) -> Html<String> {
    let command = commands::StartStory {
        correlation_id: Uuid::new_v4(),
    };
    match command_handlers::begin_mount_story(&command, &state.session) {
        Ok(request) => finish_in_background(&state, request),
        Err(e) => debug!(error = %e, "story already under way"),
    }

    Html(render_page(&query_handlers::get_session_view(&state.session)))
}

/// POST /story/choose
#[instrument(skip(state, form), fields(choice = form.choice))]
async fn choose(State(state): State<AppState>, Form(form): Form<ChooseForm>) -> Redirect {
    let command = commands::SelectChoice {
        correlation_id: Uuid::new_v4(),
        choice_index: form.choice,
    };

    info!(correlation_id = %command.correlation_id, "handling select_choice form");

    match command_handlers::begin_select_choice(&command, &state.session) {
        Ok(request) => finish_in_background(&state, request),
        Err(e) => warn!(error = %e, "choice rejected"),
    }

    Redirect::to("/")
}

/// POST /story/restart
#[instrument(skip(state))]
async fn restart(State(state): State<AppState>) -> Redirect {
    let command = commands::StartStory {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling restart form");

    match command_handlers::begin_start_story(&command, &state.session) {
        Ok(request) => finish_in_background(&state, request),
        Err(e) => warn!(error = %e, "restart rejected"),
    }

    Redirect::to("/")
}

/// Finishes a begun turn without waiting for it.
fn finish_in_background(state: &AppState, request: TurnRequest) {
    drop(state.spawn_turn(request));
}

/// Escapes text for interpolation into HTML content and attribute values.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the full page for a session snapshot.
fn render_page(view: &SessionView) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    if view.is_loading() {
        html.push_str(&format!(
            "<meta http-equiv=\"refresh\" content=\"{REFRESH_SECONDS}\">\n"
        ));
    }
    html.push_str(&format!(
        "<title>A Fúria do Hulk</title>\n<style>{STYLE}</style>\n"
    ));
    html.push_str("</head>\n<body>\n<main>\n<header>\n<h1>A FÚRIA DO HULK</h1>\n");
    html.push_str("<p>Uma Aventura Interativa em Quadrinhos</p>\n</header>\n");

    html.push_str("<div class=\"log\">\n");
    for (index, part) in view.transcript.iter().enumerate() {
        html.push_str("<div class=\"part\">\n");
        if let Some(url) = &part.image_url {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"Cena da história em quadrinhos {}\">\n",
                escape_html(url),
                index + 1
            ));
        }
        let class = if part.is_choice { "echo" } else { "narrative" };
        html.push_str(&format!(
            "<p class=\"{class}\">{}</p>\n",
            escape_html(&part.text)
        ));
        html.push_str("</div>\n");
    }

    if view.is_loading() {
        html.push_str("<div class=\"spinner\">Gerando a próxima cena...</div>\n");
    }

    if let Some(error) = &view.error {
        html.push_str("<div class=\"error\">\n<p><strong>Ocorreu um erro:</strong></p>\n");
        html.push_str(&format!("<p>{}</p>\n", escape_html(error)));
        html.push_str(RESTART_FORM);
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");

    if !view.choices.is_empty() {
        html.push_str("<section class=\"choices\">\n<h2>O QUE HULK FAZ?</h2>\n");
        for (index, choice) in view.choices.iter().enumerate() {
            html.push_str(&format!(
                "<form method=\"post\" action=\"/story/choose\">\
                 <input type=\"hidden\" name=\"choice\" value=\"{index}\">\
                 <button class=\"choice\" type=\"submit\">{}</button></form>\n",
                escape_html(choice)
            ));
        }
        html.push_str(RESTART_FORM);
        html.push_str("</section>\n");
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

const RESTART_FORM: &str = "<form method=\"post\" action=\"/story/restart\">\
<button class=\"restart\" type=\"submit\">Recomeçar História</button></form>\n";

/// Returns the router for the story page.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/story/choose", post(choose))
        .route("/story/restart", post(restart))
}
