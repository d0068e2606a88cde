//! Conversion of JSON variable maps into renderer [`Variables`].
//!
//! Variables arrive over the API and out of JSONB columns as arbitrary JSON
//! values; the renderer only deals in strings.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::render::Variables;

/// Render a JSON value as the text a placeholder should show.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // For arrays and objects, use JSON representation
        _ => value.to_string(),
    }
}

/// Convert a JSON object into renderer variables.
pub fn variables_from_json(map: &Map<String, Value>) -> Variables {
    map.iter()
        .map(|(key, value)| (key.clone(), value_to_string(value)))
        .collect()
}

/// Overlay `overrides` on top of `base`; overriding keys win.
pub fn merge_variables(base: &Variables, overrides: &Variables) -> Variables {
    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Serde helper: accept any JSON object (or null) as [`Variables`].
pub fn deserialize_variables<'de, D>(deserializer: D) -> Result<Variables, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<Map<String, Value>>::deserialize(deserializer)?;
    Ok(map.map(|m| variables_from_json(&m)).unwrap_or_default())
}

/// Serde helper for optional update fields.
pub fn deserialize_optional_variables<'de, D>(
    deserializer: D,
) -> Result<Option<Variables>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<Map<String, Value>>::deserialize(deserializer)?;
    Ok(map.map(|m| variables_from_json(&m)))
}

/// Serde helper distinguishing an absent field from an explicit `null`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("text")), "text");
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&Value::Null), "");
        assert_eq!(value_to_string(&json!(["a", 1])), r#"["a",1]"#);
    }

    #[test]
    fn test_variables_from_json() {
        let json = json!({"name": "Ada", "count": 3, "gone": null});
        let vars = variables_from_json(json.as_object().unwrap());

        assert_eq!(vars["name"], "Ada");
        assert_eq!(vars["count"], "3");
        assert_eq!(vars["gone"], "");
    }

    #[test]
    fn test_merge_overrides_win() {
        let base: Variables = [("a", "1"), ("b", "2")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let overrides: Variables = [("b", "3"), ("c", "4")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let merged = merge_variables(&base, &overrides);
        assert_eq!(merged["a"], "1");
        assert_eq!(merged["b"], "3");
        assert_eq!(merged["c"], "4");
    }

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "deserialize_variables")]
        variables: Variables,
        #[serde(default, deserialize_with = "double_option")]
        description: Option<Option<String>>,
    }

    #[test]
    fn test_deserialize_helpers() {
        let body: Body = serde_json::from_value(json!({"variables": {"n": 1}})).unwrap();
        assert_eq!(body.variables["n"], "1");
        assert!(body.description.is_none());

        let body: Body = serde_json::from_value(json!({"variables": null, "description": null})).unwrap();
        assert!(body.variables.is_empty());
        assert_eq!(body.description, Some(None));
    }
}
