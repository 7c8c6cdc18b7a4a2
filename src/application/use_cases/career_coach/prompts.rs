use crate::domain::career::{DiscoverRequest, RoadmapRequest, StreamAnalysisRequest};
use crate::domain::error::Result;
use std::collections::BTreeMap;

const DISCOVER_SCHEMA: &str = r#"{
  "core_personality_insight": "string",
  "honest_reality_check": "string",
  "suitable_career_streams": ["string", "string"],
  "suitable_career_roles": ["string", "string"],
  "career_types_to_avoid": ["string", "string"],
  "skill_gaps": ["string", "string"],
  "radar_trait_explanation": {
    "trait_name": "description"
  }
}"#;

const STREAM_ANALYSIS_SCHEMA: &str = r#"{
  "alignment_score": number,
  "fit_level": "string",
  "core_analysis": "string",
  "strengths": ["string"],
  "risk_factors": ["string"],
  "improvement_advice": ["string"],
  "final_verdict": "string"
}"#;

const ROADMAP_SCHEMA: &str = r#"{
  "year_1": [],
  "year_2": [],
  "year_3": []
}"#;

fn render_map(map: &BTreeMap<String, String>) -> Result<String> {
    Ok(serde_json::to_string(map)?)
}

pub(crate) fn build_discover_prompt(request: &DiscoverRequest) -> Result<String> {
    let custom_inputs = render_map(&request.custom_inputs)?;
    Ok(format!(
        "You are a career psychology analyst.

Based on these behavioral traits:
- Reaction to Pressure/Fear: {pressure_fear}
- Life/Work Preference: {life_preference}
- Role in Teams: {team_role}
- Response to Failure: {failure_response}
- Energy Drain Source: {energy_drain}
- Risk Tolerance: {risk_tolerance}

Custom Inputs: {custom_inputs}

Generate detailed behavioral career profiling including:
1. Core Personality Insight
2. Honest Reality Check
3. Suitable Career Streams
4. Suitable Career Roles
5. Career Types to Avoid
6. Skill Gaps
7. Radar-style trait explanation

Return STRICT JSON ONLY matching this structure:
{schema}
",
        pressure_fear = request.pressure_fear,
        life_preference = request.life_preference,
        team_role = request.team_role,
        failure_response = request.failure_response,
        energy_drain = request.energy_drain,
        risk_tolerance = request.risk_tolerance,
        custom_inputs = custom_inputs,
        schema = DISCOVER_SCHEMA,
    ))
}

pub(crate) fn build_stream_analysis_prompt(request: &StreamAnalysisRequest) -> Result<String> {
    let answers = render_map(&request.answers)?;
    Ok(format!(
        "You are a career stream psychologist and behavioral evaluator.

The student selected: {stream}
Behavioral answers: {answers}

Analyze:
- Motivation source (passion / money / pressure / safety)
- Patience
- Risk tolerance
- Emotional resilience
- Pressure handling

Calculate:
- alignment_score (0-100)
- fit_level (Strong Fit / Conditional Fit / High Risk of Regret)

Generate a dynamic analysis for this student, not a static template.

Return STRICT JSON ONLY:
{schema}
",
        stream = request.selected_stream,
        answers = answers,
        schema = STREAM_ANALYSIS_SCHEMA,
    ))
}

pub(crate) fn build_roadmap_prompt(request: &RoadmapRequest) -> Result<String> {
    let discover_result = serde_json::to_string_pretty(&request.discover_result)?;
    Ok(format!(
        "You are a professional career planner.

Based on:

Discover Analysis:
{discover_result}

User Goals:
{goals}

Create a structured 3-year roadmap including:
- Skill milestones
- Certifications
- Projects
- Internship suggestions
- Learning resources

Return JSON only in structured format like:
{schema}
",
        discover_result = discover_result,
        goals = request.goals,
        schema = ROADMAP_SCHEMA,
    ))
}
