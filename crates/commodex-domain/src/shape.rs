//! Sum types for the loosely-shaped JSON an LLM emits.
//!
//! The model is asked for a fixed schema but routinely strays from it: an
//! initiative arrives as a bare string instead of an object, a SWOT list as a
//! single scalar, a manager list as one name. Each union is modeled once
//! here, with one normalization path per type, so call sites never inspect
//! raw JSON shapes themselves.

use serde::Deserialize;
use serde_json::{Map, Value};

/// An initiative entry as the model may emit it: a bare string, a structured
/// object, or something else entirely.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrInitiative {
    /// A bare description/title string.
    Text(String),
    /// An already-structured (possibly partial) initiative object.
    Structured(Map<String, Value>),
    /// Anything else; callers render it to text.
    Other(Value),
}

impl StringOrInitiative {
    /// Classify a JSON value without going through a deserializer.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Object(map) => Self::Structured(map),
            other => Self::Other(other),
        }
    }
}

/// A field that may arrive as a single scalar or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScalarOrList {
    /// Already a list.
    List(Vec<Value>),
    /// A lone value.
    Scalar(Value),
}

impl ScalarOrList {
    /// Classify a JSON value without going through a deserializer.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items),
            other => Self::Scalar(other),
        }
    }

    /// Collapse into a list of strings, wrapping a lone value into a
    /// single-element list. A `null` scalar collapses to an empty list.
    pub fn into_string_list(self) -> Vec<String> {
        match self {
            Self::List(items) => items.iter().map(coerce_string).collect(),
            Self::Scalar(Value::Null) => Vec::new(),
            Self::Scalar(value) => vec![coerce_string(&value)],
        }
    }

    /// Collapse into a list of names: a lone string becomes a single-element
    /// list, any other lone value is demoted to an empty list.
    pub fn into_name_list(self) -> Vec<String> {
        match self {
            Self::List(items) => items.iter().map(coerce_string).collect(),
            Self::Scalar(Value::String(name)) => vec![name],
            Self::Scalar(_) => Vec::new(),
        }
    }
}

/// Render a JSON value as the string the canonical schema expects: strings
/// pass through, everything else is rendered as its JSON text.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn untagged_initiative_deserializes_both_shapes() {
        let text: StringOrInitiative = serde_json::from_value(json!("Reduce packaging")).unwrap();
        assert!(matches!(text, StringOrInitiative::Text(_)));

        let object: StringOrInitiative =
            serde_json::from_value(json!({"description": "Hedge contract"})).unwrap();
        assert!(matches!(object, StringOrInitiative::Structured(_)));
    }

    #[test]
    fn scalar_wraps_into_single_element_list() {
        let wrapped = ScalarOrList::from_value(json!("Strong brand")).into_string_list();
        assert_eq!(wrapped, vec!["Strong brand".to_string()]);
    }

    #[test]
    fn null_scalar_collapses_to_empty() {
        assert!(ScalarOrList::from_value(Value::Null)
            .into_string_list()
            .is_empty());
    }

    #[test]
    fn name_list_demotes_non_string_scalars() {
        assert!(ScalarOrList::from_value(json!(42)).into_name_list().is_empty());
        assert_eq!(
            ScalarOrList::from_value(json!("J. Meier")).into_name_list(),
            vec!["J. Meier".to_string()]
        );
    }

    #[test]
    fn lists_pass_through_with_string_coercion() {
        let list = ScalarOrList::from_value(json!(["Labor", 12])).into_string_list();
        assert_eq!(list, vec!["Labor".to_string(), "12".to_string()]);
    }
}
