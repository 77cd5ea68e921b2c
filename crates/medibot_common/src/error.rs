//! Errors raised by the upstream model adapters.

use thiserror::Error;

/// Failure talking to a text-completion endpoint
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("Upstream returned empty response")]
    EmptyResponse,

    #[error("Credential not available: {0} is not set")]
    MissingCredential(String),
}

impl LlmError {
    /// Map a reqwest-style transport failure, keeping timeouts distinct
    pub fn transport(is_timeout: bool, timeout_secs: u64, detail: impl std::fmt::Display) -> Self {
        if is_timeout {
            LlmError::Timeout(timeout_secs)
        } else {
            LlmError::Http(format!("Request failed: {}", detail))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_maps_timeout() {
        let err = LlmError::transport(true, 30, "deadline");
        assert!(matches!(err, LlmError::Timeout(30)));
        assert_eq!(err.to_string(), "Request timeout after 30 seconds");

        let err = LlmError::transport(false, 30, "connection refused");
        assert_eq!(err.to_string(), "HTTP error: Request failed: connection refused");
    }
}
