//! Medibot daemon library - exposes modules for testing.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod generation;
pub mod prompts;
pub mod render;
pub mod routes;
pub mod server;
pub mod store;
