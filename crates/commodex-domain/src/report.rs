//! Terminal failure shape.

use serde::{Deserialize, Serialize};

/// Alternate output shape produced when any pipeline stage irrecoverably
/// fails.
///
/// Mutually exclusive with [`CommodityRecord`](crate::CommodityRecord);
/// consumers branch on the presence of the `error` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Rendered error kind and message.
    pub error: String,

    /// The unparsed model reply, preserved so a human can recover the data
    /// manually. Present only for parse failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,

    /// Remediation hint. Present only when the request exceeded the model's
    /// context window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_keys_are_omitted() {
        let record = ErrorRecord {
            error: "API error: HTTP 502".to_string(),
            raw_response: None,
            solution: None,
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"error": "API error: HTTP 502"})
        );
    }

    #[test]
    fn raw_response_survives_round_trip() {
        let record = ErrorRecord {
            error: "failed to parse model reply as JSON".to_string(),
            raw_response: Some("I could not find any JSON.".to_string()),
            solution: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        let parsed: ErrorRecord = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, record);
    }
}
