use crate::domain::error::AppError;
use crate::domain::extraction::{
    AttemptFailure, AttemptOutcome, ExtractedResult, ExtractionFailure, FailureKind, RetryPolicy,
    PARSE_FAILURE_MESSAGE,
};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::extract_json_value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Asks the model for JSON and retries, with a fixed pause, until a value
/// parses or the retry budget runs out.
pub struct StructuredGenerationUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: Arc<LLMConfig>,
    policy: RetryPolicy,
}

impl StructuredGenerationUseCase {
    pub fn new(
        llm_client: Arc<dyn LLMClient + Send + Sync>,
        config: Arc<LLMConfig>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            llm_client,
            config,
            policy,
        }
    }

    /// Never fails: exhausting the budget yields `ExtractedResult::Failed`
    /// carrying the last raw text.
    pub async fn execute(&self, prompt: &str) -> ExtractedResult {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;

        loop {
            let failure = match self.attempt(prompt).await {
                AttemptOutcome::Parsed(value) => {
                    debug!(attempt, "Model response parsed");
                    return ExtractedResult::Parsed(value);
                }
                AttemptOutcome::Failed(failure) => failure,
            };

            warn!(
                attempt,
                max_attempts,
                kind = %failure.kind,
                reason = %failure.reason,
                "Model attempt failed"
            );

            if attempt >= max_attempts {
                warn!(attempts = attempt, "Retry budget exhausted");
                return ExtractedResult::Failed(ExtractionFailure {
                    error: PARSE_FAILURE_MESSAGE.to_string(),
                    raw_response: failure.raw_response,
                });
            }

            tokio::time::sleep(self.policy.backoff()).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, prompt: &str) -> AttemptOutcome {
        let text = match self.llm_client.generate(&self.config, prompt).await {
            Ok(text) => text,
            Err(err) => {
                let kind = match err {
                    AppError::EnvelopeError(_) => FailureKind::Envelope,
                    _ => FailureKind::Transport,
                };
                let description = err.to_string();
                return AttemptOutcome::Failed(AttemptFailure {
                    kind,
                    reason: description.clone(),
                    raw_response: description,
                });
            }
        };

        match extract_json_value(&text) {
            Ok(value) => AttemptOutcome::Parsed(value),
            Err(err) => AttemptOutcome::Failed(AttemptFailure {
                kind: FailureKind::Extraction,
                reason: err.to_string(),
                raw_response: text,
            }),
        }
    }
}
