//! Panelcraft — Story Service.
//!
//! Builds the start, continue and illustration prompts, sends them through a
//! `GenerationBackend`, and turns the raw upstream answers into a validated
//! `StoryResponse` or a displayable image URL.

pub mod application;
pub mod domain;
