use crate::application::{CareerCoachUseCase, StructuredGenerationUseCase};
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::{LLMClient, RouterClient};
use crate::interfaces::http::{start_server, HttpState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn build_state(config: &AppConfig, llm_client: Arc<dyn LLMClient + Send + Sync>) -> HttpState {
    let llm_config = Arc::new(config.llm.clone());
    let generator = Arc::new(StructuredGenerationUseCase::new(
        llm_client.clone(),
        llm_config.clone(),
        config.retry,
    ));

    HttpState {
        career_coach: Arc::new(CareerCoachUseCase::new(generator)),
        llm_client,
        llm_config,
    }
}

/// Loads configuration and serves until shutdown. A missing credential
/// returns before anything is bound.
pub async fn run() -> Result<()> {
    let config = AppConfig::load()?;
    let state = build_state(&config, Arc::new(RouterClient::new()));

    let server = start_server(state, &config)?;
    info!(
        host = %config.host,
        port = config.port,
        origins = ?config.cors_origins,
        "CareerCoach backend listening"
    );
    server.await?;

    info!("CareerCoach backend stopped");
    Ok(())
}
