//! Restaurant Assist — multi-turn restaurant search dialog.

pub mod config;
pub mod dialog;
pub mod error;
pub mod input;
pub mod language;
pub mod location;
pub mod search;
pub mod session;
