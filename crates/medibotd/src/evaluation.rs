//! Evaluation adapter - asks a second model to estimate ROUGE/BLEU style
//! scores for a query/response pair and parses them from free text.
//!
//! The scores are the model's own estimate with no reference text behind
//! them. They are advisory only: every failure here degrades to absent
//! scores and never blocks the answer.

use crate::config::EvaluationConfig;
use crate::prompts::build_evaluation_prompt;
use anyhow::Result;
use async_trait::async_trait;
use medibot_common::{LlmError, Scores};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Scores a generated response
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Best-effort scoring; unrecoverable fields are `None`
    async fn evaluate(&self, query: &str, response: &str) -> Scores;
}

/// Parse `LABEL: value` lines into scores.
///
/// Lines without a colon, unknown labels and malformed numbers are skipped.
/// A label seen twice keeps its last parsable value.
pub fn parse_scores(text: &str) -> Scores {
    let mut scores = Scores::default();

    for line in text.trim().lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let Ok(value) = value.trim().parse::<f64>() else {
            continue;
        };

        match label.trim() {
            "ROUGE-1" => scores.rouge1 = Some(value),
            "ROUGE-2" => scores.rouge2 = Some(value),
            "ROUGE-L" => scores.rouge_l = Some(value),
            "BLEU" => scores.bleu = Some(value),
            _ => {}
        }
    }

    scores
}

/// Evaluator backed by a Gemini-style `generateContent` endpoint
pub struct GeminiEvaluator {
    config: EvaluationConfig,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiEvaluator {
    pub fn new(config: EvaluationConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send a free-text prompt and return the model's text reply
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let timeout_secs = self.config.timeout_secs;
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::transport(e.is_timeout(), timeout_secs, e))?;

        if !response.status().is_success() {
            return Err(LlmError::Status(response.status().as_u16()));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidJson(format!("Failed to parse response: {}", e)))?;

        extract_candidate_text(&json).ok_or(LlmError::EmptyResponse)
    }
}

/// Concatenate the text parts of the first candidate
fn extract_candidate_text(json: &Value) -> Option<String> {
    let parts = json["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Warn when nothing was recovered, note partial recovery at debug
fn report_recovery(scores: &Scores, text: &str) {
    if scores.is_empty() {
        warn!("Evaluation reply had no parsable scores, storing without scores: {:?}", text);
    } else if scores.recovered() < 4 {
        debug!("Evaluation recovered {}/4 scores from: {:?}", scores.recovered(), text);
    }
}

#[async_trait]
impl Evaluator for GeminiEvaluator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn evaluate(&self, query: &str, response: &str) -> Scores {
        let prompt = build_evaluation_prompt(query, response);

        match self.complete(&prompt).await {
            Ok(text) => {
                let scores = parse_scores(&text);
                report_recovery(&scores, &text);
                scores
            }
            Err(e) => {
                warn!("Evaluation unavailable, storing without scores: {}", e);
                Scores::default()
            }
        }
    }
}

/// Evaluator used when evaluation is switched off or has no credential
#[derive(Debug, Default)]
pub struct DisabledEvaluator;

#[async_trait]
impl Evaluator for DisabledEvaluator {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn evaluate(&self, _query: &str, _response: &str) -> Scores {
        Scores::default()
    }
}

/// Fake evaluator for testing: parses a fixed reply text
pub struct FakeEvaluator {
    reply: String,
    call_count: AtomicUsize,
}

impl FakeEvaluator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Evaluator for FakeEvaluator {
    fn name(&self) -> &str {
        "fake"
    }

    async fn evaluate(&self, _query: &str, _response: &str) -> Scores {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        parse_scores(&self.reply)
    }
}
