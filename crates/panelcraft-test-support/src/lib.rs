//! Shared test doubles and utilities for Panelcraft.

mod backend;
mod upstream;

pub use backend::{FailingBackend, ScriptedBackend, image_reply, story_reply};
pub use upstream::{spawn_upstream, unused_local_url};
