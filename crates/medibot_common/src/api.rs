//! Wire types for the inbound HTTP API.

use crate::exchange::Scores;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
///
/// `query` is optional at the type level so that a missing field is reported
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: Option<String>,
}

impl ChatRequest {
    /// The query if present and not blank
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Response of `POST /api/chat`, both for success and generation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Scores>,
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn success(response: String, evaluation: Scores) -> Self {
        Self {
            response,
            evaluation: Some(evaluation),
            status: ResponseStatus::Success,
            error: None,
        }
    }

    pub fn failure(fallback: &str, error: String) -> Self {
        Self {
            response: fallback.to_string(),
            evaluation: None,
            status: ResponseStatus::Error,
            error: Some(error),
        }
    }
}

/// Error payload for validation and storage failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
