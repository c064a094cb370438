//! Locate the JSON object inside a model reply
//!
//! Models wrap their answer in code fences, greet the user first, or add a
//! closing remark. Extraction only cuts the candidate out; parsing and repair
//! happen in [`crate::repair`].

use crate::config::ScanMode;

/// Cut the JSON candidate out of `raw`
///
/// A single surrounding code fence is removed first. If no object span is
/// found the trimmed text is returned unchanged.
///
/// # Examples
///
/// ```
/// use pagesmith_designer::{extract_candidate, ScanMode};
///
/// let raw = "blah ```json\n{\"a\":1}\n``` blah";
/// assert_eq!(extract_candidate(raw, ScanMode::Greedy), "{\"a\":1}");
/// ```
pub fn extract_candidate(raw: &str, mode: ScanMode) -> &str {
    let text = strip_fence(raw);
    let span = match mode {
        ScanMode::Greedy => greedy_span(text),
        ScanMode::Balanced => balanced_span(text).or_else(|| greedy_span(text)),
    };
    span.unwrap_or(text)
}

/// Remove one leading ```lang fence and one trailing ``` fence
fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// First `{` through last `}`
fn greedy_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// First complete top-level object, ignoring braces inside strings
fn balanced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_object() {
        assert_eq!(extract_candidate(r#"{"a":1}"#, ScanMode::Greedy), r#"{"a":1}"#);
    }

    #[test]
    fn test_fenced_object() {
        let raw = "```json\n{\"a\": [1, 2]}\n```";
        assert_eq!(extract_candidate(raw, ScanMode::Greedy), "{\"a\": [1, 2]}");
    }

    #[test]
    fn test_fence_without_language() {
        let raw = "```\n{\"a\":1}\n```";
        assert_eq!(extract_candidate(raw, ScanMode::Greedy), "{\"a\":1}");
    }

    #[test]
    fn test_object_inside_prose() {
        let raw = "Sure! Here it is:\n{\"title\":\"x\"}\nHope this helps.";
        assert_eq!(extract_candidate(raw, ScanMode::Greedy), "{\"title\":\"x\"}");
    }

    #[test]
    fn test_no_object_returns_trimmed_text() {
        assert_eq!(extract_candidate("  no json here  ", ScanMode::Greedy), "no json here");
        assert_eq!(extract_candidate("} backwards {", ScanMode::Greedy), "} backwards {");
    }

    #[test]
    fn test_greedy_spans_multiple_fragments() {
        let raw = "{\"a\":1} and {\"b\":2}";
        assert_eq!(extract_candidate(raw, ScanMode::Greedy), raw);
    }

    #[test]
    fn test_balanced_takes_first_object() {
        let raw = "{\"a\":1} and {\"b\":2}";
        assert_eq!(extract_candidate(raw, ScanMode::Balanced), "{\"a\":1}");
    }

    #[test]
    fn test_balanced_ignores_braces_in_strings() {
        let raw = r#"note {"text":"a } b \" {","n":{"m":1}} tail"#;
        assert_eq!(
            extract_candidate(raw, ScanMode::Balanced),
            r#"{"text":"a } b \" {","n":{"m":1}}"#
        );
    }

    #[test]
    fn test_balanced_falls_back_to_greedy_when_unclosed() {
        let raw = "{\"a\": {\"b\": 1}";
        assert_eq!(extract_candidate(raw, ScanMode::Balanced), raw);
    }
}
