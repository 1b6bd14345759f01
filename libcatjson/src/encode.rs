//! Encode values back to text.
//!
//! Object keys are always emitted in sorted order so output is stable across
//! runs. Strings are written as their stored raw text between quotes; since
//! the parser never decodes escapes, whatever escapes the source had come out
//! unchanged.

use crate::outline::outline;
use crate::Value;

/// Output format for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Minimal JSON without whitespace.
    Json,
    /// JSON indented by two spaces per level.
    Pretty,
    /// Indented key/value outline, as written by [`crate::write_outline`].
    Outline,
}

/// Encode a value to a string in the specified format.
pub fn encode(value: &Value, format: Format) -> String {
    match format {
        Format::Json => {
            let mut out = String::new();
            encode_json(&mut out, value);
            out
        }
        Format::Pretty => {
            let mut out = encode_pretty(value, 0);
            out.push('\n');
            out
        }
        Format::Outline => outline(value),
    }
}

// =============================================================================
// Minimal JSON
// =============================================================================

fn encode_json(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&encode_number(*n)),
        Value::String(s) => encode_string(out, s),
        Value::Array(arr) => {
            out.push('[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                encode_json(out, item);
            }
            out.push(']');
        }
        Value::Object(obj) => {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            out.push('{');
            for (i, k) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                encode_string(out, k);
                out.push(':');
                encode_json(out, &obj[k]);
            }
            out.push('}');
        }
    }
}

fn encode_string(out: &mut String, s: &str) {
    out.push('"');
    out.push_str(s);
    out.push('"');
}

fn encode_number(n: f64) -> String {
    if n.is_nan() || n.is_infinite() {
        "null".to_string() // JSON doesn't support NaN/Infinity
    } else {
        format!("{}", n)
    }
}

// =============================================================================
// Pretty JSON
// =============================================================================

fn encode_pretty(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let pad1 = "  ".repeat(indent + 1);

    match value {
        Value::Array(arr) => {
            if arr.is_empty() {
                "[]".to_string()
            } else {
                let items: Vec<String> = arr
                    .iter()
                    .map(|v| format!("{}{}", pad1, encode_pretty(v, indent + 1)))
                    .collect();
                format!("[\n{}\n{}]", items.join(",\n"), pad)
            }
        }
        Value::Object(obj) => {
            if obj.is_empty() {
                "{}".to_string()
            } else {
                let mut keys: Vec<&String> = obj.keys().collect();
                keys.sort();
                let items: Vec<String> = keys
                    .iter()
                    .map(|k| {
                        format!(
                            "{}\"{}\": {}",
                            pad1,
                            k,
                            encode_pretty(&obj[*k], indent + 1)
                        )
                    })
                    .collect();
                format!("{{\n{}\n{}}}", items.join(",\n"), pad)
            }
        }
        scalar => encode(scalar, Format::Json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn minimal_json_has_no_whitespace_and_sorted_keys() {
        let v = parse(r#"{ "b": [1, 2.5, -3e2], "a": {"z": null, "y": false} }"#).unwrap();
        assert_eq!(
            encode(&v, Format::Json),
            r#"{"a":{"y":false,"z":null},"b":[1,2.5,-300]}"#
        );
    }

    #[test]
    fn source_escapes_survive() {
        let v = parse(r#"["tab\there", "quote\"d", "é"]"#).unwrap();
        assert_eq!(
            encode(&v, Format::Json),
            r#"["tab\there","quote\"d","é"]"#
        );
    }

    #[test]
    fn non_finite_numbers_become_null() {
        let v = Value::Array(vec![
            Value::Number(f64::INFINITY),
            Value::Number(f64::NAN),
        ]);
        assert_eq!(encode(&v, Format::Json), "[null,null]");
    }

    #[test]
    fn pretty_layout() {
        let v = parse(r#"{"list": [1, {}], "empty": [], "name": "x"}"#).unwrap();
        let expected = "\
{
  \"empty\": [],
  \"list\": [
    1,
    {}
  ],
  \"name\": \"x\"
}
";
        assert_eq!(encode(&v, Format::Pretty), expected);
    }

    #[test]
    fn pretty_output_parses_back() {
        let v = parse(r#"[{"a": [true, null]}, [[]], "s"]"#).unwrap();
        assert_eq!(parse(&encode(&v, Format::Pretty)).unwrap(), v);
    }
}
