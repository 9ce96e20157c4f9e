//! Panelcraft Core — shared story abstractions.
//!
//! This crate defines the types and traits every other crate depends on: the
//! transcript entry, the structured story response, the generation request
//! wire types and the backend seam the story service calls through. It
//! contains no infrastructure code.

pub mod error;
pub mod generation;
pub mod story;
