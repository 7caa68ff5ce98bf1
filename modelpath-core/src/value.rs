//! Helpers over the `serde_json::Value` object graph that paths traverse.

use serde_json::{Map, Value};

/// Short name of a value's shape, used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Text form of a scalar, as compared by list filters.
///
/// Null and containers have no text form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// True when a slot holds nothing a write would clobber: null or "".
pub fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Whether `map[property]` renders to exactly `expected`.
pub fn property_equals(map: &Map<String, Value>, property: &str, expected: &str) -> bool {
    map.get(property)
        .and_then(scalar_text)
        .is_some_and(|text| text == expected)
}

/// Whether `map` matches a filter value on the first of `properties` it carries.
///
/// A property whose value is null or absent is skipped, so `sysName` falls
/// back to `name` only when the element has no `sysName`.
pub fn default_property_equals(
    map: &Map<String, Value>,
    properties: &[String],
    expected: &str,
) -> bool {
    properties
        .iter()
        .find_map(|p| map.get(p).filter(|v| !v.is_null()))
        .and_then(scalar_text)
        .is_some_and(|text| text == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected map, got {}", type_name(&other)),
        }
    }

    #[test]
    fn test_type_names() {
        assert_eq!(type_name(&json!(null)), "null");
        assert_eq!(type_name(&json!(true)), "boolean");
        assert_eq!(type_name(&json!(1.5)), "number");
        assert_eq!(type_name(&json!("x")), "string");
        assert_eq!(type_name(&json!([])), "list");
        assert_eq!(type_name(&json!({})), "map");
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!("AD")).as_deref(), Some("AD"));
        assert_eq!(scalar_text(&json!(42)).as_deref(), Some("42"));
        assert_eq!(scalar_text(&json!(false)).as_deref(), Some("false"));
        assert_eq!(scalar_text(&json!(null)), None);
        assert_eq!(scalar_text(&json!({"a": 1})), None);
    }

    #[test]
    fn test_is_vacant() {
        assert!(is_vacant(&json!(null)));
        assert!(is_vacant(&json!("")));
        assert!(!is_vacant(&json!(" ")));
        assert!(!is_vacant(&json!(0)));
        assert!(!is_vacant(&json!({})));
    }

    #[test]
    fn test_property_equals_coerces_numbers() {
        let map = as_map(json!({"id": 42}));
        assert!(property_equals(&map, "id", "42"));
        assert!(!property_equals(&map, "id", "41"));
        assert!(!property_equals(&map, "missing", "42"));
    }

    #[test]
    fn test_default_property_prefers_first_present() {
        let properties = vec!["sysName".to_string(), "name".to_string()];

        let with_sys = as_map(json!({"sysName": "AD", "name": "Other"}));
        assert!(default_property_equals(&with_sys, &properties, "AD"));
        assert!(!default_property_equals(&with_sys, &properties, "Other"));

        let name_only = as_map(json!({"name": "AD"}));
        assert!(default_property_equals(&name_only, &properties, "AD"));

        let null_sys = as_map(json!({"sysName": null, "name": "AD"}));
        assert!(default_property_equals(&null_sys, &properties, "AD"));
    }
}
