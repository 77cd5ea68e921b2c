//! Shared types for medibot: exchange records, score fields, wire types and
//! upstream model errors.

pub mod api;
pub mod error;
pub mod exchange;

pub use api::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse, ResponseStatus};
pub use error::LlmError;
pub use exchange::{Exchange, NewExchange, Scores};

/// Crate version, reported in startup logs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
