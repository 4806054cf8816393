//! Core module: graph model, CSV loading and rendering

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod render;

/// Returns the current version of the `immunograph` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
