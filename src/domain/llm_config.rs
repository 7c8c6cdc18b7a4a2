use serde::{Deserialize, Serialize};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const OPENROUTER_DEFAULT_MODEL: &str = "google/gemini-flash-1.5";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    /// Single-candidate envelope: `candidates[0].content.parts[0].text`.
    #[default]
    Gemini,
    /// Choice-list envelope: `choices[0].message.content`.
    OpenRouter,
}

impl LLMProvider {
    /// Environment variable consulted when no key is configured explicitly.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            LLMProvider::Gemini => "GEMINI_API_KEY",
            LLMProvider::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            LLMProvider::Gemini => GEMINI_BASE_URL,
            LLMProvider::OpenRouter => OPENROUTER_BASE_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LLMProvider::Gemini => GEMINI_DEFAULT_MODEL,
            LLMProvider::OpenRouter => OPENROUTER_DEFAULT_MODEL,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl LLMConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::Gemini,
            base_url: None,
            model: None,
            api_key: None,
            max_tokens: None,
            temperature: Some(0.7),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_provider() {
        let config = LLMConfig {
            provider: LLMProvider::OpenRouter,
            ..Default::default()
        };
        assert_eq!(config.base_url(), OPENROUTER_BASE_URL);
        assert_eq!(config.model(), OPENROUTER_DEFAULT_MODEL);
    }

    #[test]
    fn test_blank_overrides_fall_back_to_defaults() {
        let config = LLMConfig {
            model: Some("   ".to_string()),
            base_url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.base_url(), GEMINI_BASE_URL);
        assert_eq!(config.model(), GEMINI_DEFAULT_MODEL);
    }

    #[test]
    fn test_provider_names_are_lowercase() {
        let provider: LLMProvider = serde_json::from_str("\"openrouter\"").unwrap();
        assert_eq!(provider, LLMProvider::OpenRouter);
        assert_eq!(provider.api_key_env(), "OPENROUTER_API_KEY");
    }
}
