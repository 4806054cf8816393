//! Data models for `immunograph`

pub mod graph;
pub mod status;

pub use graph::ImmunizationGraph;
pub use status::Status;
