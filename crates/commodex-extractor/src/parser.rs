//! Recover a JSON payload from a raw model reply.

use crate::error::ExtractorError;
use serde_json::Value;

/// Locate the JSON candidate inside a model reply.
///
/// Precedence, first match wins:
/// 1. content of the first ```` ```json ````-tagged code fence
/// 2. content of the first generic code fence pair
/// 3. the inclusive substring from the first `{` to the last `}`
/// 4. the whole text, unchanged
pub fn extract_json(response: &str) -> &str {
    if let Some(inner) = fenced_block(response, "```json") {
        return inner;
    }
    if let Some(inner) = fenced_block(response, "```") {
        return inner;
    }
    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if start < end {
            return &response[start..=end];
        }
    }
    response
}

/// Content between `open` and the next closing fence, trimmed.
fn fenced_block<'a>(text: &'a str, open: &str) -> Option<&'a str> {
    let (_, after) = text.split_once(open)?;
    let (inner, _) = after.split_once("```")?;
    Some(inner.trim())
}

/// Parse the model reply into a JSON value.
///
/// Never panics; a reply that holds no parseable JSON yields a
/// [`ExtractorError::Parse`] carrying the original text verbatim so a human
/// can recover the data manually.
pub fn parse_response(response: &str) -> Result<Value, ExtractorError> {
    let candidate = extract_json(response);
    serde_json::from_str(candidate).map_err(|e| ExtractorError::Parse {
        message: e.to_string(),
        raw_response: response.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_fence_wins_over_surrounding_prose() {
        let response = "Here is the data you asked for:\n```json\n{\"commodity_name\": \"Sugar\"}\n```\nLet me know if you need more.";
        assert_eq!(extract_json(response), "{\"commodity_name\": \"Sugar\"}");
        assert_eq!(
            parse_response(response).unwrap(),
            json!({"commodity_name": "Sugar"})
        );
    }

    #[test]
    fn generic_fence_is_second_choice() {
        let response = "```\n{\"commodity_name\": \"Dairy\"}\n```";
        assert_eq!(extract_json(response), "{\"commodity_name\": \"Dairy\"}");
    }

    #[test]
    fn tagged_fence_preferred_even_when_generic_fence_comes_first() {
        let response = "```\nnot json\n```\n```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json(response), "{\"a\": 1}");
    }

    #[test]
    fn brace_substring_strips_prose() {
        let response = "Sure! {\"commodity_name\": \"Oils\"} Hope that helps.";
        assert_eq!(extract_json(response), "{\"commodity_name\": \"Oils\"}");
    }

    #[test]
    fn brace_substring_spans_first_to_last() {
        let response = "{\"a\": {\"b\": 1}} trailing {\"c\": 2}";
        // First `{` to last `}`: not valid JSON, but extraction is textual.
        assert_eq!(extract_json(response), "{\"a\": {\"b\": 1}} trailing {\"c\": 2}");
    }

    #[test]
    fn no_fences_no_braces_passes_through_unchanged() {
        let response = "I could not find any structured information.";
        assert_eq!(extract_json(response), response);
    }

    #[test]
    fn unparseable_reply_preserves_raw_text() {
        let response = "I could not find any structured information.";
        match parse_response(response) {
            Err(ExtractorError::Parse { raw_response, .. }) => {
                assert_eq!(raw_response, response);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn clean_json_parses_directly() {
        let response = r#"{"commodity_name": "Cocoa", "cost_drivers": {"Labor": 35}}"#;
        let value = parse_response(response).unwrap();
        assert_eq!(value["commodity_name"], json!("Cocoa"));
    }

    #[test]
    fn unclosed_fence_falls_back_to_braces() {
        let response = "```json\n{\"a\": 1}";
        // No closing fence, so the brace scan recovers the object.
        assert_eq!(extract_json(response), "{\"a\": 1}");
    }
}
