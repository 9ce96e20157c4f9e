//! Application services for story generation.

pub mod story_service;
