//! Session aggregate, commands and turn types.

pub mod commands;
pub mod seed;
pub mod session;
pub mod turn;
