//! Attribute value transformations
//!
//! Config attributes are flat scalars; the API wants nested JSON. These
//! helpers cover the two directions plus the handful of light coercions
//! the resource handlers share.

use std::collections::HashMap;

use puppis_core::resource::Value;

/// Parse a YAML attribute string into the JSON value the API expects.
///
/// Blank input means an empty mapping, matching what the server stores
/// when no variables are supplied.
pub fn yaml_to_json(yaml: &str) -> Result<serde_json::Value, String> {
    if yaml.trim().is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    serde_yaml::from_str(yaml).map_err(|e| format!("invalid YAML: {}", e))
}

/// Render a structured API value back to the YAML string form used in
/// configuration.
///
/// Null and empty mappings render as the empty string so an omitted
/// attribute stays omitted; the output is trimmed so simple scalars
/// round-trip byte-for-byte.
pub fn json_to_yaml(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::Object(map) if map.is_empty() => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Parse an optional numeric id out of a string attribute ("" means unset)
pub fn optional_int(s: &str) -> Result<Option<i64>, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| format!("'{}' is not a numeric id", s))
}

/// Convert a JSON value into the config value model
pub fn json_to_value(value: &serde_json::Value) -> Option<Value> {
    match value {
        serde_json::Value::String(s) => Some(Value::String(s.clone())),
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Value::Int(i))
            } else {
                n.as_f64().map(|f| Value::Int(f as i64))
            }
        }
        serde_json::Value::Array(arr) => {
            let items: Vec<Value> = arr.iter().filter_map(json_to_value).collect();
            Some(Value::List(items))
        }
        serde_json::Value::Object(map) => {
            let mut entries = HashMap::new();
            for (key, value) in map {
                if let Some(v) = json_to_value(value) {
                    entries.insert(key.clone(), v);
                }
            }
            Some(Value::Map(entries))
        }
        serde_json::Value::Null => None,
    }
}

/// Convert a config value into JSON for request payloads.
///
/// Unresolved references have no JSON form and yield None.
pub fn value_to_json(value: &Value) -> Option<serde_json::Value> {
    match value {
        Value::String(s) => Some(serde_json::json!(s)),
        Value::Bool(b) => Some(serde_json::json!(b)),
        Value::Int(i) => Some(serde_json::json!(i)),
        Value::List(items) => {
            let arr: Vec<serde_json::Value> = items.iter().filter_map(value_to_json).collect();
            Some(serde_json::Value::Array(arr))
        }
        Value::Map(entries) => {
            let mut map = serde_json::Map::new();
            for (key, value) in entries {
                if let Some(v) = value_to_json(value) {
                    map.insert(key.clone(), v);
                }
            }
            Some(serde_json::Value::Object(map))
        }
        Value::Ref(_, _) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_round_trip_for_simple_mapping() {
        let json = yaml_to_json("limit: webservers\ndays: 7").unwrap();
        assert_eq!(json["limit"], "webservers");
        assert_eq!(json["days"], 7);

        let yaml = json_to_yaml(&json);
        let back = yaml_to_json(&yaml).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn blank_yaml_is_an_empty_mapping() {
        assert_eq!(
            yaml_to_json("").unwrap(),
            serde_json::Value::Object(serde_json::Map::new())
        );
        assert_eq!(yaml_to_json("   \n").unwrap(), serde_json::json!({}));
    }

    #[test]
    fn empty_structures_render_as_empty_string() {
        assert_eq!(json_to_yaml(&serde_json::Value::Null), "");
        assert_eq!(json_to_yaml(&serde_json::json!({})), "");
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let err = yaml_to_json("{ not: [ closed").unwrap_err();
        assert!(err.contains("invalid YAML"));
    }

    #[test]
    fn optional_int_parses_and_rejects() {
        assert_eq!(optional_int("").unwrap(), None);
        assert_eq!(optional_int("  ").unwrap(), None);
        assert_eq!(optional_int("42").unwrap(), Some(42));
        assert_eq!(optional_int(" 7 ").unwrap(), Some(7));
        assert!(optional_int("seven").is_err());
    }

    #[test]
    fn value_json_conversions() {
        let value = Value::List(vec![Value::Int(1), Value::String("two".to_string())]);
        assert_eq!(value_to_json(&value).unwrap(), serde_json::json!([1, "two"]));

        let json = serde_json::json!({"nested": {"flag": true}});
        let back = json_to_value(&json).unwrap();
        match back {
            Value::Map(entries) => match entries.get("nested") {
                Some(Value::Map(inner)) => {
                    assert_eq!(inner.get("flag"), Some(&Value::Bool(true)));
                }
                other => panic!("expected nested map, got {other:?}"),
            },
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn unresolved_refs_have_no_json_form() {
        let value = Value::Ref("org".to_string(), "id".to_string());
        assert!(value_to_json(&value).is_none());
    }
}
