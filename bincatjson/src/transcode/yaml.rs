//! YAML transcoding: render parsed JSON values as YAML text.
//!
//! Mapping:
//!   - Value::Null    -> YAML null
//!   - Value::Bool    -> YAML bool
//!   - Value::Number  -> YAML integer when integral and exact, else YAML float
//!   - Value::String  -> YAML string (JSON escapes decoded)
//!   - Value::Array   -> YAML sequence
//!   - Value::Object  -> YAML mapping (keys sorted)

use super::{as_exact_integer, decode_string};
use libcatjson::Value;

/// Encode a Value as a YAML string.
pub fn encode(value: &Value) -> Result<String, String> {
    let yaml_value = value_to_yaml(value)?;
    serde_yaml::to_string(&yaml_value).map_err(|e| format!("YAML encode error: {}", e))
}

fn value_to_yaml(value: &Value) -> Result<serde_yaml::Value, String> {
    let yaml = match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Number(n) => match as_exact_integer(*n) {
            Some(i) => serde_yaml::Value::Number(serde_yaml::Number::from(i)),
            None => serde_yaml::Value::Number(serde_yaml::Number::from(*n)),
        },
        Value::String(s) => serde_yaml::Value::String(decode_string(s)?),
        Value::Array(arr) => serde_yaml::Value::Sequence(
            arr.iter().map(value_to_yaml).collect::<Result<_, _>>()?,
        ),
        Value::Object(obj) => {
            let mut map = serde_yaml::Mapping::new();
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            for k in keys {
                map.insert(
                    serde_yaml::Value::String(decode_string(k)?),
                    value_to_yaml(&obj[k])?,
                );
            }
            serde_yaml::Value::Mapping(map)
        }
    };
    Ok(yaml)
}
