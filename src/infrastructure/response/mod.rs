use crate::domain::error::{AppError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").expect("valid regex"));

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").expect("valid regex"));

static INTERNAL_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<internal>[\s\S]*?</internal>").expect("valid regex"));

static FENCED_BLOCK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?[ \t]*\r?\n(.*?)```").expect("valid regex"));

static FENCE_MARKER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json|```").expect("valid regex"));

/// Removes reasoning artifacts some models prepend to their answer.
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = THINK_TAG_PATTERN.replace_all(response, "").to_string();
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned = INTERNAL_TAG_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned.trim().to_string()
}

/// Where in the model text a JSON candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonSource {
    FencedBlock,
    GreedySpan,
    StrippedText,
}

/// Picks the JSON candidate out of free-form model text.
///
/// Precedence is fenced block, then the span from the first `{` to the last
/// `}`, then the whole text with fence markers removed. The first candidate
/// found is the only one parsed.
pub fn locate_json_candidate(text: &str) -> (JsonSource, String) {
    if let Some(inner) = FENCED_BLOCK_PATTERN
        .captures(text)
        .and_then(|captures| captures.get(1))
    {
        return (JsonSource::FencedBlock, inner.as_str().trim().to_string());
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            return (JsonSource::GreedySpan, text[start..=end].to_string());
        }
    }

    let stripped = FENCE_MARKER_PATTERN.replace_all(text, "");
    (JsonSource::StrippedText, stripped.trim().to_string())
}

/// Extracts a single JSON value from model output. Any JSON value is
/// accepted, objects are not required.
pub fn extract_json_value(text: &str) -> Result<Value> {
    let cleaned = clean_llm_response(text);
    if cleaned.is_empty() {
        return Err(AppError::ParseError("Model returned empty text".to_string()));
    }

    let (source, candidate) = locate_json_candidate(&cleaned);
    serde_json::from_str::<Value>(&candidate).map_err(|err| {
        AppError::ParseError(format!("Invalid JSON in {:?}: {}", source, err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>{\"a\": 1}";
        assert_eq!(clean_llm_response(input), "{\"a\": 1}");
    }

    #[test]
    fn test_clean_self_closing_think() {
        assert_eq!(clean_llm_response("<think />answer"), "answer");
    }

    #[test]
    fn test_clean_reasoning_and_internal_tags() {
        let input = "<reasoning>why</reasoning><internal>debug</internal> Output ";
        assert_eq!(clean_llm_response(input), "Output");
    }

    #[test]
    fn test_fenced_json_block() {
        let input = "```json\n{\"alignment_score\": 72, \"fit_level\": \"Strong Fit\"}\n```";
        assert_eq!(
            extract_json_value(input).unwrap(),
            json!({"alignment_score": 72, "fit_level": "Strong Fit"})
        );
    }

    #[test]
    fn test_fenced_block_without_language_tag() {
        let input = "Here you go:\n```\n{\"year_1\": [\"SQL\"]}\n```\nGood luck!";
        let (source, _) = locate_json_candidate(input);
        assert_eq!(source, JsonSource::FencedBlock);
        assert_eq!(extract_json_value(input).unwrap(), json!({"year_1": ["SQL"]}));
    }

    #[test]
    fn test_fenced_block_equals_direct_parse() {
        let body = "{\"strengths\": [\"patience\"], \"nested\": {\"k\": [1, 2, {\"x\": null}]}}";
        let input = format!("Intro text\n```json\n{}\n```\ntrailing", body);
        let direct: Value = serde_json::from_str(body).unwrap();
        assert_eq!(extract_json_value(&input).unwrap(), direct);
    }

    #[test]
    fn test_greedy_span_with_surrounding_prose() {
        let input = "Sure, here it is: {\"a\": 1} thanks!";
        let (source, candidate) = locate_json_candidate(input);
        assert_eq!(source, JsonSource::GreedySpan);
        assert_eq!(candidate, "{\"a\": 1}");
        assert_eq!(extract_json_value(input).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_greedy_span_with_nested_object() {
        let input = "Result: {\"radar\": {\"grit\": \"high\"}} -- end";
        assert_eq!(
            extract_json_value(input).unwrap(),
            json!({"radar": {"grit": "high"}})
        );
    }

    #[test]
    fn test_greedy_span_over_captures_second_object() {
        // First-to-last brace swallows the prose between two objects.
        let input = "{\"a\": 1} and also {\"b\": 2}";
        let (source, candidate) = locate_json_candidate(input);
        assert_eq!(source, JsonSource::GreedySpan);
        assert_eq!(candidate, input);
        assert!(extract_json_value(input).is_err());
    }

    #[test]
    fn test_greedy_span_stray_brace_in_trailing_prose() {
        let input = "note {\"a\": {\"b\": 2}} closing brace }";
        let (_, candidate) = locate_json_candidate(input);
        assert_eq!(candidate, "{\"a\": {\"b\": 2}} closing brace }");
        assert!(extract_json_value(input).is_err());
    }

    #[test]
    fn test_matched_fence_with_bad_json_does_not_fall_through() {
        let input = "```json\n{broken\n```\n{\"a\": 1}";
        assert!(extract_json_value(input).is_err());
    }

    #[test]
    fn test_bare_array_accepted() {
        assert_eq!(extract_json_value("[1, 2, 3]").unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_stray_fence_markers_stripped() {
        let input = "```json[\"a\", \"b\"]```";
        let (source, candidate) = locate_json_candidate(input);
        assert_eq!(source, JsonSource::StrippedText);
        assert_eq!(candidate, "[\"a\", \"b\"]");
        assert_eq!(extract_json_value(input).unwrap(), json!(["a", "b"]));
    }

    #[test]
    fn test_not_json_at_all() {
        assert!(matches!(
            extract_json_value("not json at all"),
            Err(AppError::ParseError(_))
        ));
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_json_value("").is_err());
        assert!(extract_json_value("  \n ").is_err());
    }

    #[test]
    fn test_reextracting_parsed_value_is_identity() {
        let value = json!({
            "core_personality_insight": "Calm under pressure",
            "skill_gaps": ["public speaking"],
            "radar_trait_explanation": {"resilience": "high"}
        });
        let serialized = serde_json::to_string(&value).unwrap();
        assert_eq!(extract_json_value(&serialized).unwrap(), value);

        let pretty = serde_json::to_string_pretty(&value).unwrap();
        assert_eq!(extract_json_value(&pretty).unwrap(), value);
    }
}
