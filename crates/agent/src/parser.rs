//! Turns the model's final text into a [`TakeAnalysis`].
//!
//! Parsing never fails: anything that is not a JSON object (after stripping
//! an optional Markdown fence) yields a "mid" fallback analysis that still
//! carries a usable roast.

use legm_core::analysis::{MAX_ROAST_CHARS, TakeAnalysis, truncate_chars};
use legm_core::chart::ChartSpec;
use serde_json::{Map, Value};
use tracing::{debug, warn};

const DEFAULT_VERDICT: &str = "mid";
const DEFAULT_CONFIDENCE: f64 = 0.5;
const FALLBACK_ROAST: &str = "Couldn't process this take dawg";
const FALLBACK_REASONING: &str = "Failed to parse LLM response as JSON";
/// How much of the unparseable text is echoed into the fallback roast.
const FALLBACK_ECHO_CHARS: usize = 200;

/// Parse, validate and repair the model's final answer.
pub fn parse_analysis(raw: &str) -> TakeAnalysis {
    let text = strip_code_fence(raw.trim());

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(obj)) => from_object(&obj),
        Ok(other) => {
            warn!(kind = json_kind(&other), "Model answer is JSON but not an object");
            fallback(raw)
        }
        Err(e) => {
            warn!(error = %e, "Model answer is not valid JSON");
            fallback(raw)
        }
    }
}

/// Remove a surrounding ``` fence, with or without a language tag.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the rest of the opening line (language tag)
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

fn from_object(obj: &Map<String, Value>) -> TakeAnalysis {
    let verdict = obj
        .get("verdict")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_VERDICT)
        .to_string();

    let confidence = obj
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    let roast = obj.get("roast").and_then(Value::as_str).unwrap_or_default();

    let reasoning = obj
        .get("reasoning")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let stats_used = match obj.get("stats_used") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };

    let chart_data = match obj.get("chart_data") {
        None | Some(Value::Null) => None,
        Some(value) => match ChartSpec::from_value(value) {
            Ok(spec) => Some(spec),
            Err(e) => {
                debug!(error = %e, "Dropping invalid chart_data");
                None
            }
        },
    };

    TakeAnalysis {
        verdict,
        confidence,
        roast: truncate_chars(roast, MAX_ROAST_CHARS),
        reasoning,
        stats_used,
        chart_data,
        chart_png: None,
    }
}

fn fallback(raw: &str) -> TakeAnalysis {
    let raw = raw.trim();
    let roast = if raw.is_empty() {
        FALLBACK_ROAST.to_string()
    } else {
        format!("{FALLBACK_ROAST}: {}", truncate_chars(raw, FALLBACK_ECHO_CHARS))
    };

    TakeAnalysis {
        verdict: DEFAULT_VERDICT.into(),
        confidence: DEFAULT_CONFIDENCE,
        roast: truncate_chars(&roast, MAX_ROAST_CHARS),
        reasoning: FALLBACK_REASONING.into(),
        stats_used: Vec::new(),
        chart_data: None,
        chart_png: None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legm_core::chart::ChartFormat;

    const FINAL_JSON: &str = r#"{"verdict":"trash","confidence":0.9,"roast":"Bro said LeBron is washed? He averaging 25/7/7 dawg respectfully delete this","reasoning":"LeBron still elite","stats_used":["25.0 PPG"]}"#;

    #[test]
    fn plain_json() {
        let result = parse_analysis(FINAL_JSON);
        assert_eq!(result.verdict, "trash");
        assert_eq!(result.confidence, 0.9);
        assert!(result.roast.contains("delete this"));
        assert_eq!(result.reasoning, "LeBron still elite");
        assert_eq!(result.stats_used, vec!["25.0 PPG"]);
        assert!(result.chart_data.is_none());
        assert!(result.chart_png.is_none());
    }

    #[test]
    fn fenced_and_bare_are_equivalent() {
        let bare = parse_analysis(FINAL_JSON);
        let tagged = parse_analysis(&format!("```json\n{FINAL_JSON}\n```"));
        let untagged = parse_analysis(&format!("```\n{FINAL_JSON}\n```"));
        let padded = parse_analysis(&format!("\n\n  ```json\n{FINAL_JSON}\n```  \n"));
        assert_eq!(bare, tagged);
        assert_eq!(bare, untagged);
        assert_eq!(bare, padded);
    }

    #[test]
    fn single_line_tagged_fence_parses() {
        let result = parse_analysis(&format!("```json{FINAL_JSON}```"));
        assert_eq!(result, parse_analysis(FINAL_JSON));
        assert_ne!(result.reasoning, "Failed to parse LLM response as JSON");
    }

    #[test]
    fn invalid_json_falls_back() {
        let result = parse_analysis("this is not json at all");
        assert_eq!(result.verdict, "mid");
        assert_eq!(result.confidence, 0.5);
        assert!(result.roast.contains("this is not json at all"));
        assert!(result.reasoning.contains("Failed to parse"));
        assert!(result.stats_used.is_empty());
        assert!(result.chart_data.is_none());
    }

    #[test]
    fn empty_input_falls_back_without_echo() {
        for input in ["", "   \n"] {
            let result = parse_analysis(input);
            assert_eq!(result.roast, "Couldn't process this take dawg");
            assert_eq!(result.verdict, "mid");
        }
    }

    #[test]
    fn fallback_echo_is_capped() {
        let raw = "x".repeat(1000);
        let result = parse_analysis(&raw);
        let expected = format!("Couldn't process this take dawg: {}", "x".repeat(200));
        assert_eq!(result.roast, expected);
        assert!(result.roast.chars().count() <= MAX_ROAST_CHARS);
    }

    #[test]
    fn non_object_json_falls_back() {
        let result = parse_analysis("[1, 2, 3]");
        assert_eq!(result.verdict, "mid");
        assert!(result.reasoning.contains("Failed to parse"));
    }

    #[test]
    fn missing_fields_get_defaults() {
        let result = parse_analysis("{}");
        assert_eq!(result.verdict, "mid");
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.roast, "");
        assert_eq!(result.reasoning, "");
        assert!(result.stats_used.is_empty());
    }

    #[test]
    fn verdict_kept_verbatim() {
        let result = parse_analysis(r#"{"verdict":"cooked","roast":"r"}"#);
        assert_eq!(result.verdict, "cooked");
    }

    #[test]
    fn long_roast_truncated_to_280() {
        let long_roast = "a".repeat(400);
        let raw = serde_json::json!({"verdict": "trash", "roast": long_roast}).to_string();
        let result = parse_analysis(&raw);
        assert_eq!(result.roast.chars().count(), 280);
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(parse_analysis(r#"{"confidence": 7}"#).confidence, 1.0);
        assert_eq!(parse_analysis(r#"{"confidence": -0.2}"#).confidence, 0.0);
        assert_eq!(parse_analysis(r#"{"confidence": "high"}"#).confidence, 0.5);
    }

    #[test]
    fn non_string_stats_are_stringified() {
        let result = parse_analysis(r#"{"stats_used": ["25.7 PPG", 0.54, true]}"#);
        assert_eq!(result.stats_used, vec!["25.7 PPG", "0.54", "true"]);
    }

    #[test]
    fn valid_chart_data_is_kept() {
        let raw = serde_json::json!({
            "verdict": "trash",
            "roast": "r",
            "chart_data": {
                "title": "2016 NBA Finals",
                "label_a": "LeBron James",
                "label_b": "Stephen Curry",
                "rows": [
                    {"label": "PPG", "value_a": 36.3, "value_b": 22.4},
                    {"label": "FG%", "value_a": 0.487, "value_b": 0.403, "fmt": "percent"}
                ]
            }
        })
        .to_string();
        let chart = parse_analysis(&raw).chart_data.unwrap();
        assert!(chart.is_comparison());
        assert_eq!(chart.rows[0].fmt, ChartFormat::Number);
        assert!(chart.rows[0].higher_is_better);
        assert_eq!(chart.rows[1].fmt, ChartFormat::Percent);
    }

    #[test]
    fn chart_without_rows_is_dropped() {
        let raw = serde_json::json!({
            "verdict": "valid",
            "confidence": 0.8,
            "roast": "it pains me",
            "chart_data": {"title": "t", "label_a": "a"}
        })
        .to_string();
        let result = parse_analysis(&raw);
        assert!(result.chart_data.is_none());
        assert_eq!(result.verdict, "valid");
        assert_eq!(result.roast, "it pains me");
    }

    #[test]
    fn chart_with_too_many_rows_is_dropped() {
        let rows: Vec<_> = (0..11)
            .map(|i| serde_json::json!({"label": format!("S{i}"), "value_a": i}))
            .collect();
        let raw = serde_json::json!({
            "chart_data": {"title": "t", "label_a": "a", "rows": rows}
        })
        .to_string();
        assert!(parse_analysis(&raw).chart_data.is_none());
    }

    #[test]
    fn strip_fence_variants() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("{}"), "{}");
        assert_eq!(strip_code_fence("```json\n{}"), "{}");
        assert_eq!(strip_code_fence("```json{}```"), "{}");
        assert_eq!(strip_code_fence("```{}```"), "{}");
    }
}
