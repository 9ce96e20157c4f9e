//! Command and query handlers for the story session.

pub mod command_handlers;
pub mod query_handlers;
