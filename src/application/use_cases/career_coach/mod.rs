mod prompts;

use crate::application::use_cases::structured_generation::StructuredGenerationUseCase;
use crate::domain::career::{DiscoverRequest, RoadmapRequest, StreamAnalysisRequest};
use crate::domain::error::Result;
use crate::domain::extraction::ExtractedResult;
use std::sync::Arc;
use tracing::info;

use prompts::{build_discover_prompt, build_roadmap_prompt, build_stream_analysis_prompt};

/// One operation per questionnaire: stamp the answers into a prompt and ask
/// the model for JSON.
pub struct CareerCoachUseCase {
    generator: Arc<StructuredGenerationUseCase>,
}

impl CareerCoachUseCase {
    pub fn new(generator: Arc<StructuredGenerationUseCase>) -> Self {
        Self { generator }
    }

    pub async fn discover(&self, request: &DiscoverRequest) -> Result<ExtractedResult> {
        let prompt = build_discover_prompt(request)?;
        info!(
            custom_inputs = request.custom_inputs.len(),
            "Generating discover profile"
        );
        Ok(self.generator.execute(&prompt).await)
    }

    pub async fn stream_analysis(&self, request: &StreamAnalysisRequest) -> Result<ExtractedResult> {
        let prompt = build_stream_analysis_prompt(request)?;
        info!(
            stream = %request.selected_stream,
            answers = request.answers.len(),
            "Generating stream analysis"
        );
        Ok(self.generator.execute(&prompt).await)
    }

    pub async fn roadmap(&self, request: &RoadmapRequest) -> Result<ExtractedResult> {
        let prompt = build_roadmap_prompt(request)?;
        info!(
            discover_keys = request.discover_result.len(),
            "Generating roadmap"
        );
        Ok(self.generator.execute(&prompt).await)
    }
}
