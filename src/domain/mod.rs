pub mod career;
pub mod error;
pub mod extraction;
pub mod llm_config;
