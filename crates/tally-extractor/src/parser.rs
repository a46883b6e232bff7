//! Parse backend replies into raw metric values

use serde_json::{Map, Value};

use crate::error::ExtractError;

/// How much of an unparsable reply to carry in the error
const SNIPPET_LEN: usize = 80;

/// Extract the first well-formed JSON object embedded in a reply
///
/// Backends wrap the object in prose or markdown fences at will; this
/// scans for brace-balanced candidates (string- and escape-aware) and
/// returns the first one that parses. Failure is an explicit error, never
/// a panic.
pub fn parse_backend_reply(reply: &str) -> Result<Map<String, Value>, ExtractError> {
    let mut search_from = 0;

    while let Some(offset) = reply[search_from..].find('{') {
        let start = search_from + offset;

        if let Some(candidate) = balanced_object(&reply[start..]) {
            if let Ok(values) = serde_json::from_str::<Map<String, Value>>(candidate) {
                return Ok(values);
            }
        }

        search_from = start + 1;
    }

    Err(ExtractError::NoJsonObject(snippet(reply)))
}

/// The brace-balanced prefix starting at a `{`, if the braces close
///
/// Braces inside JSON strings do not count; backslash escapes inside
/// strings are honored.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

fn snippet(reply: &str) -> String {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return "<empty reply>".to_string();
    }

    let cut = trimmed
        .char_indices()
        .nth(SNIPPET_LEN)
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..cut].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_object() {
        let values = parse_backend_reply(r#"{"Vendor": "Acme", "Total": 5000000}"#).unwrap();

        assert_eq!(values.get("Vendor"), Some(&json!("Acme")));
        assert_eq!(values.get("Total"), Some(&json!(5000000)));
    }

    #[test]
    fn test_parse_object_with_surrounding_prose() {
        let reply = "Here are the extracted metrics:\n\n{\"Vendor\": \"Acme\"}\n\nLet me know!";
        let values = parse_backend_reply(reply).unwrap();

        assert_eq!(values.get("Vendor"), Some(&json!("Acme")));
    }

    #[test]
    fn test_parse_object_in_markdown_fence() {
        let reply = "```json\n{\"Vendor\": \"Acme\"}\n```";
        let values = parse_backend_reply(reply).unwrap();

        assert_eq!(values.get("Vendor"), Some(&json!("Acme")));
    }

    #[test]
    fn test_parse_nested_object() {
        let reply = r#"{"Outer": {"Inner": 1}, "Total": 2}"#;
        let values = parse_backend_reply(reply).unwrap();

        assert_eq!(values.get("Total"), Some(&json!(2)));
        assert_eq!(values.get("Outer"), Some(&json!({"Inner": 1})));
    }

    #[test]
    fn test_parse_braces_inside_strings() {
        let reply = r#"{"Notes": "uses {curly} braces", "Total": 1}"#;
        let values = parse_backend_reply(reply).unwrap();

        assert_eq!(values.get("Notes"), Some(&json!("uses {curly} braces")));
    }

    #[test]
    fn test_parse_escaped_quotes_inside_strings() {
        let reply = r#"{"Quote": "she said \"hi\"", "Total": 1}"#;
        let values = parse_backend_reply(reply).unwrap();

        assert_eq!(values.get("Quote"), Some(&json!(r#"she said "hi""#)));
    }

    #[test]
    fn test_parse_skips_non_json_brace_runs() {
        // The first balanced run is not JSON; the real object follows
        let reply = r#"Template: {placeholder}. Data: {"Vendor": "Acme"}"#;
        let values = parse_backend_reply(reply).unwrap();

        assert_eq!(values.get("Vendor"), Some(&json!("Acme")));
    }

    #[test]
    fn test_parse_no_object_is_error() {
        let result = parse_backend_reply("I could not find any of the requested metrics.");

        match result {
            Err(ExtractError::NoJsonObject(s)) => {
                assert!(s.starts_with("I could not find"));
            }
            other => panic!("Expected NoJsonObject, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unclosed_object_is_error() {
        let result = parse_backend_reply(r#"{"Vendor": "Acme""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_empty_reply_is_error() {
        let result = parse_backend_reply("");

        match result {
            Err(ExtractError::NoJsonObject(s)) => assert_eq!(s, "<empty reply>"),
            other => panic!("Expected NoJsonObject, got {:?}", other),
        }
    }

    #[test]
    fn test_snippet_truncates_long_replies() {
        let long = "x".repeat(500);
        let s = snippet(&long);
        assert_eq!(s.chars().count(), SNIPPET_LEN);
    }
}
