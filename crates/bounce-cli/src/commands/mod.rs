//! CLI command implementations.

pub mod common;
pub mod graph;
pub mod jobs;
pub mod profiles;
