//! Prompt templates, the structured-output schema and reply parsing.

pub mod image;
pub mod prompts;
pub mod reply;
pub mod schema;
