use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse AI response";

/// What a caller gets back once the retry budget is spent or a parse succeeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractedResult {
    Parsed(Value),
    Failed(ExtractionFailure),
}

impl ExtractedResult {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ExtractedResult::Parsed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub error: String,
    pub raw_response: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Envelope,
    Extraction,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport"),
            FailureKind::Envelope => write!(f, "envelope"),
            FailureKind::Extraction => write!(f, "extraction"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    pub kind: FailureKind,
    pub reason: String,
    /// Model text for extraction failures, error description otherwise.
    pub raw_response: String,
}

/// Result of one round trip to the provider. Every failure is retryable.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Parsed(Value),
    Failed(AttemptFailure),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryPolicy {
    /// Additional attempts allowed after the first one fails.
    pub max_retries: u32,
    pub backoff_ms: u64,
}

impl RetryPolicy {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff_ms: 1000,
        }
    }
}
