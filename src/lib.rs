//! Shared library for `immunograph`
//! Loads immunization network graphs from CSV adjacency lists and renders them.

pub mod core;
pub mod logger;

pub use crate::core::{config, error, get_version, loader, models, render};
