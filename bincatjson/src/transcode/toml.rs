//! TOML transcoding: render parsed JSON values as TOML text.
//!
//! Mapping:
//!   - Value::Null    -> error (TOML has no null)
//!   - Value::Bool    -> TOML boolean
//!   - Value::Number  -> TOML integer when integral and exact, else TOML float
//!   - Value::String  -> TOML string (JSON escapes decoded)
//!   - Value::Array   -> TOML array (objects inside become inline tables)
//!   - Value::Object  -> TOML table
//!
//! Lossy edges:
//!   - TOML has no null type; null values cause an error.
//!   - TOML requires the top-level value to be a table; a JSON array root errors.
//!   - Non-finite numbers (from overflowing literals) come out as `inf`.

use super::{as_exact_integer, decode_string};
use libcatjson::Value;
use toml_edit::DocumentMut;

/// Encode a Value as a TOML string.
pub fn encode(value: &Value) -> Result<String, String> {
    check_toml_compatibility(value)?;
    match value_to_toml(value)? {
        toml_edit::Item::Table(table) => {
            let mut doc = DocumentMut::new();
            for (key, item) in table.iter() {
                doc[key] = item.clone();
            }
            Ok(doc.to_string())
        }
        _ => Err("TOML requires the top-level value to be a table/object".to_string()),
    }
}

fn check_toml_compatibility(value: &Value) -> Result<(), String> {
    match value {
        Value::Null => Err("TOML has no null type".to_string()),
        Value::Array(arr) => arr.iter().try_for_each(check_toml_compatibility),
        Value::Object(obj) => obj.values().try_for_each(check_toml_compatibility),
        _ => Ok(()),
    }
}

fn scalar_to_toml(value: &Value) -> Result<toml_edit::Value, String> {
    match value {
        Value::Null => Err("TOML has no null type".to_string()),
        Value::Bool(b) => Ok(toml_edit::Value::Boolean(toml_edit::Formatted::new(*b))),
        Value::Number(n) => Ok(match as_exact_integer(*n) {
            Some(i) => toml_edit::Value::Integer(toml_edit::Formatted::new(i)),
            None => toml_edit::Value::Float(toml_edit::Formatted::new(*n)),
        }),
        Value::String(s) => Ok(toml_edit::Value::String(toml_edit::Formatted::new(
            decode_string(s)?,
        ))),
        Value::Array(arr) => {
            let mut toml_arr = toml_edit::Array::new();
            for v in arr {
                toml_arr.push(scalar_to_toml(v)?);
            }
            Ok(toml_edit::Value::Array(toml_arr))
        }
        Value::Object(obj) => {
            let mut inline = toml_edit::InlineTable::new();
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            for k in keys {
                inline.insert(decode_string(k)?, scalar_to_toml(&obj[k])?);
            }
            Ok(toml_edit::Value::InlineTable(inline))
        }
    }
}

fn value_to_toml(value: &Value) -> Result<toml_edit::Item, String> {
    match value {
        Value::Object(obj) => {
            let mut table = toml_edit::Table::new();
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            for k in keys {
                table.insert(&decode_string(k)?, value_to_toml(&obj[k])?);
            }
            Ok(toml_edit::Item::Table(table))
        }
        other => Ok(toml_edit::Item::Value(scalar_to_toml(other)?)),
    }
}
