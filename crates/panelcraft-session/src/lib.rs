//! Panelcraft — Story Session.
//!
//! Owns the transcript and the current choice set of the single in-memory
//! story session, drives story turns through the story service in response
//! to reader actions, and exposes a read-only view for rendering.

pub mod application;
pub mod domain;
