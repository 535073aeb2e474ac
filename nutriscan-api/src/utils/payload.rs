//! Structured payload extraction from model replies
//!
//! Language models often wrap JSON in a markdown code fence or surround it
//! with prose. These helpers recover the JSON text before parsing.
//!
//! **Resolution order:**
//! 1. The trimmed text, when it already parses as JSON (any shape)
//! 2. Fenced block (```` ``` ```` with optional info string such as `json`)
//! 3. First balanced `{...}` object in the text
//! 4. The trimmed text as-is
//!
//! A reply that is valid JSON is never narrowed, so an array of objects stays
//! an array and is rejected by callers that require an object.

use serde_json::Value;

const FENCE: &str = "```";

/// Return the JSON text embedded in `text`
pub fn extract_json_payload(text: &str) -> &str {
    let trimmed = text.trim();

    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return trimmed;
    }

    if let Some(inner) = strip_code_fence(trimmed) {
        return inner.trim();
    }

    first_json_object(trimmed).unwrap_or(trimmed)
}

/// Extract and parse the JSON payload embedded in `text`
pub fn parse_json_payload(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(extract_json_payload(text))
}

fn strip_code_fence(text: &str) -> Option<&str> {
    let start = text.find(FENCE)?;
    let after_open = &text[start + FENCE.len()..];

    // The opening line may carry an info string (`json`); the payload starts
    // on the next line unless the fence is written on a single line.
    let body = match after_open.find('\n') {
        Some(newline) if !after_open[..newline].contains(|c: char| c == '{' || c == '[') => {
            &after_open[newline + 1..]
        }
        _ => after_open.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };

    let inner = match body.find(FENCE) {
        Some(close) => &body[..close],
        None => body,
    };
    Some(inner)
}

/// Slice of the first balanced JSON object, honoring string literals
fn first_json_object(text: &str) -> Option<&str> {
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
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
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
    use serde_json::json;

    #[test]
    fn test_plain_json_passes_through() {
        let text = "  {\"sugar\": 12.0}\n";
        assert_eq!(extract_json_payload(text), "{\"sugar\": 12.0}");
    }

    #[test]
    fn test_json_fence_is_stripped() {
        let text = "```json\n{\"sugar\": 12.0, \"sodium\": 250}\n```";
        let value = parse_json_payload(text).unwrap();
        assert_eq!(value, json!({"sugar": 12.0, "sodium": 250}));
    }

    #[test]
    fn test_bare_fence_is_stripped() {
        let text = "```\n{\"message\": \"ok\"}\n```";
        assert_eq!(extract_json_payload(text), "{\"message\": \"ok\"}");
    }

    #[test]
    fn test_single_line_fence() {
        let text = "```json {\"fiber\": 3.0} ```";
        assert_eq!(extract_json_payload(text), "{\"fiber\": 3.0}");
    }

    #[test]
    fn test_prose_around_fence() {
        let text = "Here is the data:\n```json\n{\"protein\": 7}\n```\nLet me know!";
        assert_eq!(parse_json_payload(text).unwrap(), json!({"protein": 7}));
    }

    #[test]
    fn test_unclosed_fence() {
        let text = "```json\n{\"calories\": 180.0}";
        assert_eq!(parse_json_payload(text).unwrap(), json!({"calories": 180.0}));
    }

    #[test]
    fn test_object_embedded_in_prose() {
        let text = "Sure! {\"message\": \"Too much {sugar}\", \"better_product\": \"Water\"} Enjoy.";
        let value = parse_json_payload(text).unwrap();
        assert_eq!(value["message"], json!("Too much {sugar}"));
        assert_eq!(value["better_product"], json!("Water"));
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let text = r#"note {"message": "say \"hi\" }"} trailing"#;
        assert_eq!(extract_json_payload(text), r#"{"message": "say \"hi\" }"}"#);
    }

    #[test]
    fn test_array_reply_is_not_narrowed() {
        let text = r#" [{"sugar": 30.0}, {"sugar": 1.0}] "#;

        assert_eq!(extract_json_payload(text), r#"[{"sugar": 30.0}, {"sugar": 1.0}]"#);
        assert_eq!(
            parse_json_payload(text).unwrap(),
            json!([{"sugar": 30.0}, {"sugar": 1.0}])
        );
    }

    #[test]
    fn test_fenced_array_stays_an_array() {
        let text = "```json\n[{\"message\": \"Too salty\"}]\n```";
        assert!(parse_json_payload(text).unwrap().is_array());
    }

    #[test]
    fn test_non_json_is_an_error() {
        assert!(parse_json_payload("I cannot read this label.").is_err());
    }
}
