use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct OpenRouterClient {
    client: reqwest::Client,
}

impl OpenRouterClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn api_key(config: &LLMConfig) -> Result<String> {
        config
            .api_key
            .clone()
            .ok_or_else(|| AppError::LLMError("Missing API key for OpenRouter".to_string()))
    }

    fn endpoint(config: &LLMConfig, path: &str) -> String {
        format!("{}/{}", config.base_url().trim_end_matches('/'), path)
    }

    fn build_body(config: &LLMConfig, prompt: &str) -> Value {
        let mut body = json!({
            "model": config.model(),
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
        });
        if let Some(max_tokens) = config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = config.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }

    fn text_from_envelope(envelope: &Value) -> Result<String> {
        let choices = envelope["choices"]
            .as_array()
            .filter(|choices| !choices.is_empty())
            .ok_or_else(|| {
                let detail = envelope
                    .get("error")
                    .map(|err| err.to_string())
                    .unwrap_or_else(|| "no choices".to_string());
                AppError::EnvelopeError(format!("OpenRouter response has no choices: {}", detail))
            })?;

        choices[0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::EnvelopeError("OpenRouter choice has no content".to_string()))
    }
}

impl Default for OpenRouterClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for OpenRouterClient {
    async fn generate(&self, config: &LLMConfig, prompt: &str) -> Result<String> {
        let api_key = Self::api_key(config)?;
        let url = Self::endpoint(config, "chat/completions");
        let body = Self::build_body(config, prompt);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| AppError::EnvelopeError(format!("Failed to parse JSON: {}", e)))?;

        Self::text_from_envelope(&json)
    }

    async fn list_models(&self, config: &LLMConfig) -> Result<Vec<String>> {
        let api_key = Self::api_key(config)?;
        let url = Self::endpoint(config, "models");

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| AppError::EnvelopeError(format!("Failed to parse JSON: {}", e)))?;

        let models = json["data"]
            .as_array()
            .ok_or_else(|| {
                AppError::EnvelopeError("Invalid response format: missing data array".to_string())
            })?
            .iter()
            .filter_map(|m| m["id"].as_str())
            .map(|id| id.to_string())
            .collect();

        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm_config::LLMProvider;

    fn openrouter_config() -> LLMConfig {
        LLMConfig {
            provider: LLMProvider::OpenRouter,
            model: Some("meta-llama/llama-3.1-8b-instruct".to_string()),
            base_url: Some("https://openrouter.ai/api/v1/".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_text_from_first_choice() {
        let envelope = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "```json\n{}\n```"}},
                {"message": {"role": "assistant", "content": "other"}}
            ]
        });
        assert_eq!(
            OpenRouterClient::text_from_envelope(&envelope).unwrap(),
            "```json\n{}\n```"
        );
    }

    #[test]
    fn test_empty_choices_is_envelope_error() {
        let envelope = json!({"choices": [], "error": {"message": "rate limited"}});
        match OpenRouterClient::text_from_envelope(&envelope) {
            Err(AppError::EnvelopeError(msg)) => assert!(msg.contains("rate limited")),
            other => panic!("expected envelope error, got {:?}", other),
        }
    }

    #[test]
    fn test_choice_without_content_is_envelope_error() {
        let envelope = json!({"choices": [{"message": {"role": "assistant"}}]});
        assert!(matches!(
            OpenRouterClient::text_from_envelope(&envelope),
            Err(AppError::EnvelopeError(_))
        ));
    }

    #[test]
    fn test_body_carries_single_user_message() {
        let body = OpenRouterClient::build_body(&openrouter_config(), "prompt text");
        assert_eq!(body["model"], "meta-llama/llama-3.1-8b-instruct");
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["messages"][0]["content"], "prompt text");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        assert_eq!(
            OpenRouterClient::endpoint(&openrouter_config(), "chat/completions"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }
}
