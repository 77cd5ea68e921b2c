//! Generation adapter - sends the medical prompt to an Ollama-style
//! `/api/generate` endpoint and extracts the generated text.
//!
//! Production code uses `OllamaGenerator`. Tests use `FakeGenerator` with
//! pre-configured replies.

use crate::config::GenerationConfig;
use crate::prompts::build_generation_prompt;
use anyhow::Result;
use async_trait::async_trait;
use medibot_common::LlmError;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Produces an answer for a user query
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a response. The query is assumed non-empty.
    async fn generate(&self, query: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Generator backed by an Ollama-compatible HTTP endpoint
pub struct OllamaGenerator {
    config: GenerationConfig,
    client: reqwest::Client,
}

impl OllamaGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { config, client })
    }

    fn url(&self) -> String {
        format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, query: &str) -> Result<String, LlmError> {
        let prompt = build_generation_prompt(query);
        let body = GenerateRequest {
            model: &self.config.model,
            prompt: &prompt,
            stream: false,
        };

        debug!("Sending generation request to {} ({})", self.url(), self.config.model);

        let timeout_secs = self.config.timeout_secs;
        let response = self
            .client
            .post(self.url())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::transport(e.is_timeout(), timeout_secs, e))?;

        if !response.status().is_success() {
            return Err(LlmError::Status(response.status().as_u16()));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(timeout_secs)
            } else {
                LlmError::InvalidJson(format!("Failed to parse response: {}", e))
            }
        })?;

        if parsed.response.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(parsed.response)
    }
}

/// Fake generator for testing
pub struct FakeGenerator {
    reply: Result<String, LlmError>,
    queries: Mutex<Vec<String>>,
}

impl FakeGenerator {
    /// A generator that always answers with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// A generator that always fails with `error`
    pub fn failing(error: LlmError) -> Self {
        Self {
            reply: Err(error),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Number of calls made
    pub fn call_count(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or(0)
    }

    /// Queries received, in call order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, query: &str) -> Result<String, LlmError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }
        self.reply.clone()
    }
}
