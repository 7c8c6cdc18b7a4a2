use crate::domain::error::{AppError, Result};
use crate::domain::extraction::RetryPolicy;
use crate::domain::llm_config::LLMConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const CONFIG_FILE: &str = "careercoach.toml";
pub const ENV_PREFIX: &str = "CAREERCOACH_";

/// Process configuration, loaded once at startup and handed to whoever needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub llm: LLMConfig,
    pub retry: RetryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            llm: LLMConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Reads `.env`, `careercoach.toml` and `CAREERCOACH_*` variables, in
    /// increasing priority.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(err) if err.not_found() => debug!("No .env file found"),
            Err(err) => return Err(AppError::ConfigError(format!("Invalid .env file: {}", err))),
        }

        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = Self::from_figment(figment, Env::var)?;
        info!(
            provider = ?config.llm.provider,
            model = config.llm.model(),
            max_retries = config.retry.max_retries,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Extracts the configuration and resolves the provider credential.
    /// `provider_env` looks up the provider's conventional key variable when
    /// no key was configured directly.
    pub fn from_figment<F>(figment: Figment, provider_env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: AppConfig = figment
            .extract()
            .map_err(|err| AppError::ConfigError(err.to_string()))?;

        config.llm.api_key = config
            .llm
            .api_key
            .take()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| provider_env(config.llm.provider.api_key_env()))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if config.llm.api_key.is_none() {
            return Err(AppError::ConfigError(format!(
                "{} not found in environment variables",
                config.llm.provider.api_key_env()
            )));
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
