//! Strict JSON parse with one round of textual repair

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Why a candidate could not be turned into an object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepairError {
    /// Not valid JSON, even after repair
    #[error("Unparsable JSON: {0}")]
    Unparsable(String),

    /// Valid JSON, but not an object
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// A parsed JSON object
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOutput {
    /// The object itself
    pub object: Map<String, Value>,

    /// Whether the repair round was needed
    pub repaired: bool,
}

/// Parse `candidate` as a JSON object
///
/// Strict parsing comes first. On failure, curly quotes are straightened and
/// trailing commas removed, then parsing is tried once more.
///
/// # Examples
///
/// ```
/// use pagesmith_designer::parse_object;
///
/// let parsed = parse_object("{\"a\":1,}").unwrap();
/// assert!(parsed.repaired);
/// assert_eq!(parsed.object["a"], 1);
/// ```
pub fn parse_object(candidate: &str) -> Result<ParsedOutput, RepairError> {
    let (value, repaired) = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => (value, false),
        Err(strict_error) => {
            debug!("Strict JSON parse failed: {}", strict_error);
            let fixed = repair(candidate);
            let value = serde_json::from_str::<Value>(&fixed)
                .map_err(|e| RepairError::Unparsable(e.to_string()))?;
            (value, true)
        }
    };

    match value {
        Value::Object(object) => Ok(ParsedOutput { object, repaired }),
        other => Err(RepairError::NotAnObject(kind(&other))),
    }
}

/// Straighten curly quotes and drop trailing commas
pub fn repair(text: &str) -> String {
    let straightened: String = text
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
            other => other,
        })
        .collect();
    trailing_comma().replace_all(&straightened, "$1").into_owned()
}

fn trailing_comma() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern is valid"))
}

fn kind(value: &Value) -> &'static str {
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
    use serde_json::json;

    #[test]
    fn test_strict_parse_needs_no_repair() {
        let parsed = parse_object(r#"{"a":1}"#).unwrap();
        assert!(!parsed.repaired);
        assert_eq!(Value::Object(parsed.object), json!({"a": 1}));
    }

    #[test]
    fn test_trailing_comma_repaired() {
        let parsed = parse_object(r#"{"a":1,}"#).unwrap();
        assert!(parsed.repaired);
        assert_eq!(Value::Object(parsed.object), json!({"a": 1}));
    }

    #[test]
    fn test_trailing_comma_in_array_repaired() {
        let parsed = parse_object("{\"blocks\": [1, 2, ],\n}").unwrap();
        assert_eq!(Value::Object(parsed.object), json!({"blocks": [1, 2]}));
    }

    #[test]
    fn test_smart_quotes_repaired() {
        let parsed = parse_object("{\u{201C}a\u{201D}:1}").unwrap();
        assert!(parsed.repaired);
        assert_eq!(Value::Object(parsed.object), json!({"a": 1}));
    }

    #[test]
    fn test_unrepairable() {
        assert!(matches!(parse_object("{not json"), Err(RepairError::Unparsable(_))));
        assert!(matches!(parse_object(""), Err(RepairError::Unparsable(_))));
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(parse_object("[1,2]"), Err(RepairError::NotAnObject("an array")));
        assert_eq!(parse_object("42"), Err(RepairError::NotAnObject("a number")));
    }

    #[test]
    fn test_repair_leaves_valid_text_alone() {
        assert_eq!(repair(r#"{"a":[1,2]}"#), r#"{"a":[1,2]}"#);
    }
}
