//! Lenient parsing of judge replies.
//!
//! Replies are JSON objects, sometimes wrapped in markdown fences. Each field
//! is read on its own so one malformed field never discards the rest.

use crate::error::{Result, ShortlisterError};
use crate::processing::candidate::{JudgmentClaims, RequirementSet};
use serde_json::{Map, Value};

/// Strip a leading ```` ```json ```` or ```` ``` ```` fence and a trailing ```` ``` ````
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

fn parse_object(reply: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(strip_code_fences(reply))? {
        Value::Object(map) => Ok(map),
        other => Err(ShortlisterError::MalformedJudgment(format!(
            "Expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Requirement set from a job-parse reply; missing fields take their defaults
pub fn parse_requirements(reply: &str) -> Result<RequirementSet> {
    let map = parse_object(reply)?;
    let defaults = RequirementSet::default();

    Ok(RequirementSet {
        job_title: text_field(&map, "job_title").unwrap_or(defaults.job_title),
        required_skills: list_field(&map, "required_skills"),
        preferred_skills: list_field(&map, "preferred_skills"),
        experience_level: text_field(&map, "experience_level").unwrap_or(defaults.experience_level),
        years_of_experience: text_field(&map, "years_of_experience")
            .unwrap_or(defaults.years_of_experience),
        education_requirements: list_field(&map, "education_requirements"),
        responsibilities: list_field(&map, "responsibilities"),
        industry: text_field(&map, "industry").unwrap_or(defaults.industry),
        key_requirements: list_field(&map, "key_requirements"),
    })
}

/// Claims from a resume judgment reply
pub fn parse_judgment(reply: &str) -> Result<JudgmentClaims> {
    let map = parse_object(reply)?;

    Ok(JudgmentClaims {
        candidate_name: text_field(&map, "candidate_name").unwrap_or_default(),
        matching_score: map.get("matching_score").map(score_value).unwrap_or(0.0),
        key_skills: list_field(&map, "key_skills"),
        matching_skills: list_field(&map, "matching_skills"),
        missing_skills: list_field(&map, "missing_skills"),
        summary: text_field(&map, "summary").unwrap_or_default(),
        strengths: list_field(&map, "strengths"),
        weaknesses: list_field(&map, "weaknesses"),
        experience_match: bool_field(&map, "experience_match"),
        education_match: bool_field(&map, "education_match"),
    })
}

/// Numbers as-is, numeric strings with an optional `%`, anything else 0
fn score_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Strings, with numbers rendered as text
fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Arrays of scalars; a lone string becomes a one-item list
fn list_field(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn bool_field(map: &Map<String, Value>, key: &str) -> Option<bool> {
    match map.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_full_judgment() {
        let reply = r#"```json
{
    "candidate_name": "Jane Doe",
    "matching_score": 72.5,
    "key_skills": ["Python", "LangChain"],
    "matching_skills": ["LangChain"],
    "missing_skills": ["OpenAI API"],
    "summary": "Solid GenAI background",
    "strengths": ["RAG pipelines"],
    "weaknesses": ["No OpenAI API work"],
    "experience_match": true,
    "education_match": false
}
```"#;
        let claims = parse_judgment(reply).unwrap();
        assert_eq!(claims.candidate_name, "Jane Doe");
        assert_eq!(claims.matching_score, 72.5);
        assert_eq!(claims.matching_skills, vec!["LangChain".to_string()]);
        assert_eq!(claims.experience_match, Some(true));
        assert_eq!(claims.education_match, Some(false));
    }

    #[test]
    fn test_string_scores() {
        let claims = parse_judgment(r#"{"matching_score": "85%"}"#).unwrap();
        assert_eq!(claims.matching_score, 85.0);

        let claims = parse_judgment(r#"{"matching_score": "high"}"#).unwrap();
        assert_eq!(claims.matching_score, 0.0);
    }

    #[test]
    fn test_missing_fields_default() {
        let claims = parse_judgment("{}").unwrap();
        assert!(claims.candidate_name.is_empty());
        assert_eq!(claims.matching_score, 0.0);
        assert!(claims.matching_skills.is_empty());
        assert_eq!(claims.experience_match, None);
    }

    #[test]
    fn test_malformed_fields_are_isolated() {
        let reply = r#"{"candidate_name": ["not", "a", "name"], "matching_score": 60, "matching_skills": "Rust"}"#;
        let claims = parse_judgment(reply).unwrap();
        assert!(claims.candidate_name.is_empty());
        assert_eq!(claims.matching_score, 60.0);
        assert_eq!(claims.matching_skills, vec!["Rust".to_string()]);
    }

    #[test]
    fn test_non_object_reply_is_rejected() {
        assert!(matches!(
            parse_judgment("[1, 2, 3]"),
            Err(ShortlisterError::MalformedJudgment(_))
        ));
        assert!(matches!(
            parse_judgment("I cannot help with that"),
            Err(ShortlisterError::Serialization(_))
        ));
    }

    #[test]
    fn test_parse_requirements() {
        let reply = r#"{
            "job_title": "GenAI Engineer",
            "required_skills": ["LangChain", "OpenAI API"],
            "years_of_experience": 3
        }"#;
        let requirements = parse_requirements(reply).unwrap();
        assert_eq!(requirements.job_title, "GenAI Engineer");
        assert_eq!(requirements.required_skills.len(), 2);
        assert_eq!(requirements.years_of_experience, "3");
        assert_eq!(requirements.industry, "Not specified");
        assert!(requirements.preferred_skills.is_empty());
    }
}
