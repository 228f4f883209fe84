//! Response Parser — pulls the scoring JSON object out of a free-form model reply.
//!
//! Replies often wrap the object in prose or code fences. Every `{` in the
//! reply starts a candidate; its extent is found with a string-aware
//! balanced-brace scan and the slice is decoded with serde_json. The first
//! candidate that is an object carrying all required keys decides the result.

use serde_json::{Map, Value};
use thiserror::Error;

/// Keys the scoring prompt asks for.
const REQUIRED_KEYS: [&str; 3] = ["score", "missing_skills", "remarks"];
/// Upper bound on missing skills kept per candidate.
pub const MAX_MISSING_SKILLS: usize = 20;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseFailure {
    #[error("no JSON object found in model reply")]
    NoJsonObject,

    #[error("model reply JSON is missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("score {0} is outside 0-100")]
    ScoreOutOfRange(String),

    #[error("invalid '{key}' in model reply: {detail}")]
    InvalidField { key: &'static str, detail: String },
}

/// The structured part of a scoring reply, before it is tied to a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub score: u8,
    pub missing_skills: Vec<String>,
    pub remarks: String,
}

pub fn parse_score_card(reply: &str) -> Result<ScoreCard, ParseFailure> {
    let mut first_missing: Option<&'static str> = None;

    for candidate in json_object_candidates(reply) {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate) else {
            continue;
        };
        match REQUIRED_KEYS.iter().find(|key| !map.contains_key(**key)) {
            None => return score_card_from(map),
            Some(missing) => {
                first_missing.get_or_insert(*missing);
            }
        }
    }

    Err(first_missing.map_or(ParseFailure::NoJsonObject, ParseFailure::MissingKey))
}

/// Yields every balanced `{...}` slice of `text`, in order of its opening brace.
/// Nested objects are yielded after the object that contains them.
fn json_object_candidates(text: &str) -> impl Iterator<Item = &str> {
    text.match_indices('{')
        .filter_map(move |(start, _)| balanced_object_end(text, start).map(|end| &text[start..=end]))
}

/// Byte index of the `}` closing the object opened at `start`. Braces inside
/// JSON strings do not count.
fn balanced_object_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn score_card_from(map: Map<String, Value>) -> Result<ScoreCard, ParseFailure> {
    Ok(ScoreCard {
        score: parse_score(&map["score"])?,
        missing_skills: parse_missing_skills(&map["missing_skills"])?,
        remarks: parse_remarks(&map["remarks"])?,
    })
}

fn parse_score(value: &Value) -> Result<u8, ParseFailure> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ParseFailure::InvalidField {
        key: "score",
        detail: format!("expected a number, got {value}"),
    })?;

    if !(0.0..=100.0).contains(&raw) {
        return Err(ParseFailure::ScoreOutOfRange(value.to_string()));
    }
    // Fractional scores drop their fraction.
    Ok(raw.trunc() as u8)
}

/// Accepts an array or a lone string. Blank entries are dropped and
/// duplicates (case-insensitive) keep their first spelling.
fn parse_missing_skills(value: &Value) -> Result<Vec<String>, ParseFailure> {
    let raw: Vec<String> = match value {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect(),
        other => {
            return Err(ParseFailure::InvalidField {
                key: "missing_skills",
                detail: format!("expected a list of strings, got {other}"),
            })
        }
    };

    let mut seen = std::collections::HashSet::new();
    Ok(raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .take(MAX_MISSING_SKILLS)
        .collect())
}

fn parse_remarks(value: &Value) -> Result<String, ParseFailure> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.trim().to_string()),
        other => Err(ParseFailure::InvalidField {
            key: "remarks",
            detail: format!("expected a string, got {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_reply() {
        let card = parse_score_card(
            r#"{"score": 78, "missing_skills": ["aws sagemaker"], "remarks": "Good ML background."}"#,
        )
        .unwrap();
        assert_eq!(card.score, 78);
        assert_eq!(card.missing_skills, vec!["aws sagemaker"]);
        assert_eq!(card.remarks, "Good ML background.");
    }

    #[test]
    fn test_reply_wrapped_in_prose_and_fences() {
        let reply = "Sure! Here is my evaluation:\n```json\n{\n  \"score\": 91,\n  \"missing_skills\": [],\n  \"remarks\": \"Excellent fit.\"\n}\n```\nLet me know if you need more.";
        let card = parse_score_card(reply).unwrap();
        assert_eq!(card.score, 91);
        assert!(card.missing_skills.is_empty());
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let reply = r#"{"score": 40, "missing_skills": ["C{++}"], "remarks": "Uses \"{templates}\" a lot }"}"#;
        let card = parse_score_card(reply).unwrap();
        assert_eq!(card.score, 40);
        assert_eq!(card.missing_skills, vec!["C{++}"]);
        assert_eq!(card.remarks, "Uses \"{templates}\" a lot }");
    }

    #[test]
    fn test_skips_objects_without_required_keys() {
        let reply = r#"Format: {"note": "ignore me"} Result: {"score": 55, "missing_skills": "Kubernetes", "remarks": null}"#;
        let card = parse_score_card(reply).unwrap();
        assert_eq!(card.score, 55);
        assert_eq!(card.missing_skills, vec!["Kubernetes"]);
        assert_eq!(card.remarks, "");
    }

    #[test]
    fn test_finds_object_nested_in_invalid_outer_braces() {
        let reply = r#"{result: {"score": 66, "missing_skills": [], "remarks": "ok"}}"#;
        assert_eq!(parse_score_card(reply).unwrap().score, 66);
    }

    #[test]
    fn test_score_forms() {
        let float = r#"{"score": 72.6, "missing_skills": [], "remarks": ""}"#;
        let string = r#"{"score": " 64 ", "missing_skills": [], "remarks": ""}"#;
        assert_eq!(parse_score_card(float).unwrap().score, 72);
        assert_eq!(parse_score_card(string).unwrap().score, 64);
    }

    #[test]
    fn test_score_out_of_range_is_parse_failure() {
        let high = r#"{"score": 120, "missing_skills": [], "remarks": ""}"#;
        let low = r#"{"score": -3, "missing_skills": [], "remarks": ""}"#;
        let just_above = r#"{"score": 100.4, "missing_skills": [], "remarks": ""}"#;
        let just_below = r#"{"score": -0.4, "missing_skills": [], "remarks": ""}"#;
        let as_string = r#"{"score": "100.5", "missing_skills": [], "remarks": ""}"#;
        for reply in [high, low, just_above, just_below, as_string] {
            assert!(
                matches!(parse_score_card(reply), Err(ParseFailure::ScoreOutOfRange(_))),
                "{reply} should be out of range"
            );
        }
    }

    #[test]
    fn test_score_bounds_are_inclusive() {
        let zero = r#"{"score": 0, "missing_skills": [], "remarks": ""}"#;
        let hundred = r#"{"score": 100, "missing_skills": [], "remarks": ""}"#;
        let hundred_float = r#"{"score": 100.0, "missing_skills": [], "remarks": ""}"#;
        let almost_one = r#"{"score": 0.9, "missing_skills": [], "remarks": ""}"#;
        assert_eq!(parse_score_card(zero).unwrap().score, 0);
        assert_eq!(parse_score_card(hundred).unwrap().score, 100);
        assert_eq!(parse_score_card(hundred_float).unwrap().score, 100);
        assert_eq!(parse_score_card(almost_one).unwrap().score, 0);
    }

    #[test]
    fn test_non_numeric_score_is_invalid() {
        let reply = r#"{"score": "high", "missing_skills": [], "remarks": ""}"#;
        assert!(matches!(
            parse_score_card(reply),
            Err(ParseFailure::InvalidField { key: "score", .. })
        ));
    }

    #[test]
    fn test_missing_key_reported() {
        let reply = r#"{"score": 80, "remarks": "no skills key"}"#;
        assert_eq!(
            parse_score_card(reply),
            Err(ParseFailure::MissingKey("missing_skills"))
        );
    }

    #[test]
    fn test_no_json_at_all() {
        assert_eq!(
            parse_score_card("I cannot evaluate this resume."),
            Err(ParseFailure::NoJsonObject)
        );
        assert_eq!(
            parse_score_card(r#"{"score": 80, "missing_skills": ["#),
            Err(ParseFailure::NoJsonObject)
        );
    }

    #[test]
    fn test_missing_skills_deduplicated_and_capped() {
        let skills: Vec<String> = (0..30).map(|i| format!("\"skill{i}\"")).collect();
        let reply = format!(
            r#"{{"score": 10, "missing_skills": ["AWS", "aws", " ", {}], "remarks": "x"}}"#,
            skills.join(", ")
        );
        let card = parse_score_card(&reply).unwrap();
        assert_eq!(card.missing_skills.len(), MAX_MISSING_SKILLS);
        assert_eq!(card.missing_skills[0], "AWS");
        assert_eq!(card.missing_skills[1], "skill0");
    }
}
