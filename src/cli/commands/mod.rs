//! CLI command handlers for `immunograph`.
//!
//! Rendering is the default action; `config` manages the settings file.

pub mod config;
pub mod render;
