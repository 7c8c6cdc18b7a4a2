use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use validator::Validate;

/// Behavioural questionnaire submitted from the discover page.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiscoverRequest {
    #[validate(length(min = 1, max = 4096))]
    pub pressure_fear: String,
    #[validate(length(min = 1, max = 4096))]
    pub life_preference: String,
    #[validate(length(min = 1, max = 4096))]
    pub team_role: String,
    #[validate(length(min = 1, max = 4096))]
    pub failure_response: String,
    #[validate(length(min = 1, max = 4096))]
    pub energy_drain: String,
    #[validate(length(min = 1, max = 4096))]
    pub risk_tolerance: String,
    #[serde(default)]
    pub custom_inputs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StreamAnalysisRequest {
    #[validate(length(min = 1, max = 4096))]
    pub selected_stream: String,
    /// Question id (`q1`, `q2`, ...) to free-form answer.
    pub answers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoadmapRequest {
    /// Result previously returned by the discover endpoint.
    pub discover_result: Map<String, Value>,
    #[validate(length(min = 1, max = 4096))]
    pub goals: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_custom_inputs_default_to_empty() {
        let request: DiscoverRequest = serde_json::from_value(json!({
            "pressure_fear": "freeze",
            "life_preference": "stability",
            "team_role": "planner",
            "failure_response": "analyse",
            "energy_drain": "meetings",
            "risk_tolerance": "low"
        }))
        .unwrap();
        assert!(request.custom_inputs.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_goals_fail_validation() {
        let request = RoadmapRequest {
            discover_result: Map::new(),
            goals: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_roadmap_requires_object() {
        let parsed = serde_json::from_value::<RoadmapRequest>(json!({
            "discover_result": [1, 2],
            "goals": "become a data engineer"
        }));
        assert!(parsed.is_err());
    }
}
