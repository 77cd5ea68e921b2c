//! Exchange records and their quality scores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four advisory quality scores attached to an exchange.
///
/// Each field is independently nullable: the evaluation model may omit any of
/// them, or the whole evaluation call may fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub rouge1: Option<f64>,
    pub rouge2: Option<f64>,
    #[serde(rename = "rougeL")]
    pub rouge_l: Option<f64>,
    pub bleu: Option<f64>,
}

impl Scores {
    /// True when no score was recovered at all
    pub fn is_empty(&self) -> bool {
        self.rouge1.is_none() && self.rouge2.is_none() && self.rouge_l.is_none() && self.bleu.is_none()
    }

    /// Number of recovered scores (0..=4)
    pub fn recovered(&self) -> usize {
        [self.rouge1, self.rouge2, self.rouge_l, self.bleu]
            .iter()
            .filter(|s| s.is_some())
            .count()
    }
}

/// An exchange about to be persisted (no id or timestamp yet)
#[derive(Debug, Clone, PartialEq)]
pub struct NewExchange {
    pub query: String,
    pub response: String,
    pub scores: Scores,
}

impl NewExchange {
    pub fn new(query: impl Into<String>, response: impl Into<String>, scores: Scores) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            scores,
        }
    }
}

/// A persisted query/response/score record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: i64,
    pub query: String,
    pub response: String,
    #[serde(flatten)]
    pub scores: Scores,
    pub created_at: DateTime<Utc>,
}
