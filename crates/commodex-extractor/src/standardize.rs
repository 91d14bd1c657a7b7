//! Coerce loosely-shaped model output into the canonical record shape.
//!
//! The model is instructed to return the canonical schema but strays from it
//! in practice. Every coercion here is total and idempotent: running
//! [`standardize`] over its own output is a no-op. Keys are never dropped,
//! absent keys stay absent, and unknown keys pass through untouched.

use commodex_domain::{coerce_string, ScalarOrList, StringOrInitiative};
use serde_json::{Map, Number, Value};

const SWOT_KEYS: [&str; 4] = ["strengths", "weaknesses", "opportunities", "threats"];

/// Which initiative list an entry belongs to; drives ID prefix, the text
/// field a bare string lands in, and the remaining required keys.
#[derive(Clone, Copy)]
enum InitiativeKind {
    Quantitative,
    Qualitative,
}

impl InitiativeKind {
    fn id_prefix(self) -> &'static str {
        match self {
            Self::Quantitative => "QT",
            Self::Qualitative => "Q",
        }
    }

    fn text_key(self) -> &'static str {
        match self {
            Self::Quantitative => "description",
            Self::Qualitative => "title",
        }
    }
}

/// Standardize a parsed model reply into the canonical record shape.
///
/// Non-mapping input is passed through unchanged.
pub fn standardize(value: Value) -> Value {
    let mut map = match value {
        Value::Object(map) => map,
        other => return other,
    };

    for field in ["commodity_name", "creation_date", "valid_until"] {
        if let Some(value) = map.remove(field) {
            map.insert(field.to_string(), normalize_scalar_text(value));
        }
    }

    if let Some(value) = map.remove("responsible_managers") {
        let managers = ScalarOrList::from_value(value).into_name_list();
        map.insert(
            "responsible_managers".to_string(),
            Value::Array(managers.into_iter().map(Value::String).collect()),
        );
    }

    if let Some(value) = map.remove("cost_drivers") {
        map.insert("cost_drivers".to_string(), normalize_value_map(value, true));
    }

    if let Some(value) = map.remove("sustainability_factors") {
        map.insert(
            "sustainability_factors".to_string(),
            normalize_value_map(value, false),
        );
    }

    for (field, kind) in [
        ("quantitative_initiatives", InitiativeKind::Quantitative),
        ("qualitative_initiatives", InitiativeKind::Qualitative),
    ] {
        if let Some(value) = map.remove(field) {
            map.insert(field.to_string(), normalize_initiatives(value, kind));
        }
    }

    if let Some(value) = map.remove("swot_analysis") {
        map.insert("swot_analysis".to_string(), normalize_swot(value));
    }

    Value::Object(map)
}

/// Free-form scalar fields: strings and null pass through, other scalars are
/// rendered as text, structured values are demoted to null.
fn normalize_scalar_text(value: Value) -> Value {
    match value {
        Value::String(_) | Value::Null => value,
        Value::Number(_) | Value::Bool(_) => Value::String(coerce_string(&value)),
        Value::Array(_) | Value::Object(_) => Value::Null,
    }
}

/// Mappings of name → value. With `numeric` set, string values have `%` and
/// `k€` suffixes stripped and become numbers when the remainder parses;
/// unparsable strings keep their original text.
fn normalize_value_map(value: Value, numeric: bool) -> Value {
    match value {
        Value::Object(map) if numeric => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, normalize_numeric(value)))
                .collect(),
        ),
        Value::Object(_) | Value::Null => value,
        _ => Value::Null,
    }
}

/// Strip `%` / `k€` suffixes and parse to a number when possible.
fn normalize_numeric(value: Value) -> Value {
    match value {
        Value::String(text) => {
            let cleaned = text.replace('%', "").replace("k€", "");
            match cleaned.trim().parse::<f64>().ok().and_then(Number::from_f64) {
                Some(number) => Value::Number(number),
                None => Value::String(text),
            }
        }
        other => other,
    }
}

fn normalize_initiatives(value: Value, kind: InitiativeKind) -> Value {
    let entries = match value {
        Value::Null => return Value::Null,
        Value::Array(entries) => entries,
        single => vec![single],
    };
    Value::Array(
        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| normalize_initiative(entry, index, kind))
            .collect(),
    )
}

/// Promote one initiative entry to a full object: a bare string becomes the
/// text field, missing required keys are filled, present keys are kept.
fn normalize_initiative(entry: Value, index: usize, kind: InitiativeKind) -> Value {
    let mut object = match StringOrInitiative::from_value(entry) {
        StringOrInitiative::Structured(object) => object,
        StringOrInitiative::Text(text) => {
            let mut object = Map::new();
            object.insert(kind.text_key().to_string(), Value::String(text));
            object
        }
        StringOrInitiative::Other(value) => {
            let mut object = Map::new();
            object.insert(kind.text_key().to_string(), Value::String(coerce_string(&value)));
            object
        }
    };

    let id = match object.remove("id") {
        Some(Value::String(id)) => id,
        Some(value @ (Value::Number(_) | Value::Bool(_))) => coerce_string(&value),
        _ => format!("{}{}", kind.id_prefix(), index + 1),
    };
    object.insert("id".to_string(), Value::String(id));

    let text = match object.remove(kind.text_key()) {
        Some(Value::String(text)) => text,
        Some(value) if !value.is_null() => coerce_string(&value),
        _ => format!("Initiative {}", index + 1),
    };
    object.insert(kind.text_key().to_string(), Value::String(text));

    match kind {
        InitiativeKind::Quantitative => {
            let value_eur = match object.remove("value_eur") {
                Some(number @ Value::Number(_)) => number,
                Some(text @ Value::String(_)) => {
                    let parsed = normalize_numeric(text);
                    if parsed.is_number() {
                        parsed
                    } else {
                        Value::Null
                    }
                }
                _ => Value::Null,
            };
            object.insert("value_eur".to_string(), value_eur);

            let status = match object.remove("status") {
                Some(Value::String(status)) => Value::String(status),
                Some(value @ (Value::Number(_) | Value::Bool(_))) => {
                    Value::String(coerce_string(&value))
                }
                _ => Value::Null,
            };
            object.insert("status".to_string(), status);
        }
        InitiativeKind::Qualitative => {
            let description = match object.remove("description") {
                Some(Value::String(description)) => Value::String(description),
                _ => Value::Null,
            };
            object.insert("description".to_string(), description);
        }
    }

    Value::Object(object)
}

/// Force all four SWOT keys to exist as string lists; a present scalar wraps
/// into a single-element list. Keys outside the four are kept.
fn normalize_swot(value: Value) -> Value {
    let Value::Object(mut object) = value else {
        return Value::Null;
    };
    for key in SWOT_KEYS {
        let list = ScalarOrList::from_value(object.remove(key).unwrap_or(Value::Null))
            .into_string_list();
        object.insert(
            key.to_string(),
            Value::Array(list.into_iter().map(Value::String).collect()),
        );
    }
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_mapping_input_passes_through() {
        assert_eq!(standardize(json!([1, 2])), json!([1, 2]));
        assert_eq!(standardize(json!("text")), json!("text"));
        assert_eq!(standardize(Value::Null), Value::Null);
    }

    #[test]
    fn bare_string_qualitative_initiative_is_promoted() {
        let standardized = standardize(json!({
            "qualitative_initiatives": ["Reduce packaging"]
        }));
        assert_eq!(
            standardized["qualitative_initiatives"][0],
            json!({"id": "Q1", "title": "Reduce packaging", "description": null})
        );
    }

    #[test]
    fn partial_quantitative_initiative_is_completed() {
        let standardized = standardize(json!({
            "quantitative_initiatives": [
                {"description": "Hedge contract", "value_eur": 50000}
            ]
        }));
        assert_eq!(
            standardized["quantitative_initiatives"][0],
            json!({
                "id": "QT1",
                "description": "Hedge contract",
                "value_eur": 50000,
                "status": null
            })
        );
    }

    #[test]
    fn initiative_ids_are_synthesized_positionally() {
        let standardized = standardize(json!({
            "quantitative_initiatives": ["First", {"id": "SRC-9", "description": "Second"}, "Third"]
        }));
        let items = standardized["quantitative_initiatives"].as_array().unwrap();
        assert_eq!(items[0]["id"], json!("QT1"));
        assert_eq!(items[1]["id"], json!("SRC-9"));
        assert_eq!(items[2]["id"], json!("QT3"));
    }

    #[test]
    fn scalar_swot_entry_is_wrapped_and_missing_keys_filled() {
        let standardized = standardize(json!({
            "swot_analysis": {"strengths": "Strong brand"}
        }));
        assert_eq!(
            standardized["swot_analysis"],
            json!({
                "strengths": ["Strong brand"],
                "weaknesses": [],
                "opportunities": [],
                "threats": []
            })
        );
    }

    #[test]
    fn manager_string_is_promoted_to_list() {
        let standardized = standardize(json!({"responsible_managers": "J. Meier"}));
        assert_eq!(standardized["responsible_managers"], json!(["J. Meier"]));
    }

    #[test]
    fn manager_non_sequence_is_demoted_to_empty_list() {
        let standardized = standardize(json!({"responsible_managers": 7}));
        assert_eq!(standardized["responsible_managers"], json!([]));
    }

    #[test]
    fn cost_driver_suffixes_are_stripped_when_convertible() {
        let standardized = standardize(json!({
            "cost_drivers": {
                "Labor": "35%",
                "Energy": "120 k€",
                "Raw materials": 42.5,
                "Freight": "volatile"
            }
        }));
        assert_eq!(standardized["cost_drivers"]["Labor"], json!(35.0));
        assert_eq!(standardized["cost_drivers"]["Energy"], json!(120.0));
        assert_eq!(standardized["cost_drivers"]["Raw materials"], json!(42.5));
        assert_eq!(standardized["cost_drivers"]["Freight"], json!("volatile"));
    }

    #[test]
    fn absent_fields_stay_absent() {
        let standardized = standardize(json!({"commodity_name": "Sugar"}));
        let object = standardized.as_object().unwrap();
        assert!(!object.contains_key("swot_analysis"));
        assert!(!object.contains_key("responsible_managers"));
    }

    #[test]
    fn unknown_fields_pass_through() {
        let standardized = standardize(json!({"market_outlook": {"trend": "bearish"}}));
        assert_eq!(standardized["market_outlook"], json!({"trend": "bearish"}));
    }

    #[test]
    fn standardization_is_idempotent() {
        let input = json!({
            "commodity_name": "Sugar",
            "responsible_managers": "J. Meier",
            "creation_date": 2024,
            "cost_drivers": {"Labor": "35%", "Freight": "n/a"},
            "quantitative_initiatives": ["Energy cost reduction", {"description": "Hedge", "value_eur": "50 k€"}],
            "qualitative_initiatives": [{"title": "Supplier audit"}],
            "swot_analysis": {"strengths": "Strong brand", "threats": ["Weather"]},
            "sustainability_factors": {"deforestation_risk": "low"}
        });
        let once = standardize(input);
        let twice = standardize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn value_eur_string_is_parsed_or_nulled() {
        let standardized = standardize(json!({
            "quantitative_initiatives": [
                {"description": "A", "value_eur": "50 k€"},
                {"description": "B", "value_eur": "to be confirmed"}
            ]
        }));
        let items = standardized["quantitative_initiatives"].as_array().unwrap();
        assert_eq!(items[0]["value_eur"], json!(50.0));
        assert_eq!(items[1]["value_eur"], json!(null));
    }

    #[test]
    fn single_initiative_object_is_wrapped_into_list() {
        let standardized = standardize(json!({
            "qualitative_initiatives": {"title": "Supplier audit"}
        }));
        assert_eq!(
            standardized["qualitative_initiatives"],
            json!([{"id": "Q1", "title": "Supplier audit", "description": null}])
        );
    }
}
