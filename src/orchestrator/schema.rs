//! A minimal JSON-schema validator covering the subset of draft-07 the tool
//! catalog actually uses: `type`, `properties`, `required`, `enum`, and
//! `items` for arrays. No crate in this codebase's dependency stack already
//! does JSON-schema validation, so this is hand-rolled rather than borrowed;
//! it intentionally does not attempt `$ref`, `oneOf`, or numeric
//! `minimum`/`maximum` constraints, none of which the tool catalog uses.

use serde_json::Value;

/// Validate `value` against `schema`. Returns `Err` with a human-readable
/// reason on the first failure encountered.
pub fn validate(value: &Value, schema: &Value) -> Result<(), String> {
    validate_node(value, schema, "$")
}

fn validate_node(value: &Value, schema: &Value, path: &str) -> Result<(), String> {
    let Some(schema_obj) = schema.as_object() else {
        return Ok(());
    };

    if let Some(enum_values) = schema_obj.get("enum").and_then(Value::as_array) {
        if !enum_values.contains(value) {
            return Err(format!("{path}: value not in enum {enum_values:?}"));
        }
    }

    if let Some(type_name) = schema_obj.get("type").and_then(Value::as_str) {
        check_type(value, type_name, path)?;
    }

    match value {
        Value::Object(map) => {
            if let Some(required) = schema_obj.get("required").and_then(Value::as_array) {
                for req in required {
                    let Some(key) = req.as_str() else { continue };
                    if !map.contains_key(key) {
                        return Err(format!("{path}: missing required property '{key}'"));
                    }
                }
            }

            if let Some(properties) = schema_obj.get("properties").and_then(Value::as_object) {
                for (key, sub_schema) in properties {
                    if let Some(sub_value) = map.get(key) {
                        validate_node(sub_value, sub_schema, &format!("{path}.{key}"))?;
                    }
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_schema) = schema_obj.get("items") {
                for (i, item) in items.iter().enumerate() {
                    validate_node(item, item_schema, &format!("{path}[{i}]"))?;
                }
            }
        }
        _ => {}
    }

    Ok(())
}

fn check_type(value: &Value, type_name: &str, path: &str) -> Result<(), String> {
    let matches = match type_name {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        _ => true,
    };

    if matches {
        Ok(())
    } else {
        Err(format!(
            "{path}: expected type '{type_name}', got {}",
            value_kind(value)
        ))
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validates_required_properties() {
        let schema = json!({
            "type": "object",
            "properties": {"user_email": {"type": "string"}},
            "required": ["user_email"]
        });
        assert!(validate(&json!({"user_email": "a@b.com"}), &schema).is_ok());
        assert!(validate(&json!({}), &schema).is_err());
    }

    #[test]
    fn validates_type_mismatch() {
        let schema = json!({"type": "object", "properties": {"dry_run": {"type": "boolean"}}});
        assert!(validate(&json!({"dry_run": "yes"}), &schema).is_err());
        assert!(validate(&json!({"dry_run": true}), &schema).is_ok());
    }

    #[test]
    fn validates_enum() {
        let schema = json!({"enum": ["a", "b"]});
        assert!(validate(&json!("a"), &schema).is_ok());
        assert!(validate(&json!("c"), &schema).is_err());
    }
}
