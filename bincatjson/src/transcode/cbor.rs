//! CBOR transcoding: write parsed JSON values as CBOR binary data, and render
//! CBOR bytes in diagnostic notation.
//!
//! Mapping:
//!   - Value::Null    -> CBOR null (simple value 22)
//!   - Value::Bool    -> CBOR bool (simple values 20/21)
//!   - Value::Number  -> CBOR float64 (always 9 bytes, never downgraded)
//!   - Value::String  -> CBOR text string (JSON escapes decoded)
//!   - Value::Array   -> CBOR array (determinate length)
//!   - Value::Object  -> CBOR map (determinate length, sorted text string keys)

use ciborium::value::Value as CborValue;
use super::decode_string;
use libcatjson::Value;
use std::fmt::Write as FmtWrite;

// ---------------------------------------------------------------------------
// Encode (JSON -> CBOR)
//
// Written by hand rather than through ciborium's Value type, which downgrades
// float64 to float16/float32 whenever the value fits.
// ---------------------------------------------------------------------------

/// Encode a Value as CBOR bytes.
pub fn encode(value: &Value) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    write_value(&mut buf, value)?;
    Ok(buf)
}

fn write_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), String> {
    match value {
        Value::Null => buf.push(0xf6),
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Number(f) => {
            // major 7, info 27
            buf.push(0xfb);
            buf.extend_from_slice(&f.to_be_bytes());
        }
        Value::String(s) => write_text(buf, s)?,
        Value::Array(arr) => {
            write_type_and_length(buf, 4, arr.len() as u64);
            for item in arr {
                write_value(buf, item)?;
            }
        }
        Value::Object(obj) => {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            write_type_and_length(buf, 5, keys.len() as u64);
            for k in keys {
                write_text(buf, k)?;
                write_value(buf, &obj[k])?;
            }
        }
    }
    Ok(())
}

fn write_text(buf: &mut Vec<u8>, raw: &str) -> Result<(), String> {
    let text = decode_string(raw)?;
    write_type_and_length(buf, 3, text.len() as u64);
    buf.extend_from_slice(text.as_bytes());
    Ok(())
}

/// Write a CBOR major type + length argument.
///
/// The major type sits in the high 3 bits; the low 5 bits hold the argument
/// directly (0-23) or say how many argument bytes follow (24-27).
fn write_type_and_length(buf: &mut Vec<u8>, major: u8, val: u64) {
    let high = major << 5;
    match val {
        0..=23 => {
            buf.push(high | val as u8);
        }
        24..=0xff => {
            buf.push(high | 24);
            buf.push(val as u8);
        }
        0x100..=0xffff => {
            buf.push(high | 25);
            buf.extend_from_slice(&(val as u16).to_be_bytes());
        }
        0x10000..=0xffff_ffff => {
            buf.push(high | 26);
            buf.extend_from_slice(&(val as u32).to_be_bytes());
        }
        _ => {
            buf.push(high | 27);
            buf.extend_from_slice(&val.to_be_bytes());
        }
    }
}

// ---------------------------------------------------------------------------
// Diagnostic Notation (CBOR -> human-readable text, RFC 8949 §8)
// ---------------------------------------------------------------------------

/// Render bytes written by [`encode`] as diagnostic notation.
///
/// Decodes the binary rather than walking the value tree so the text shows
/// what actually went on the wire. Only the items `encode` writes are
/// accepted: null, booleans, floats, text, arrays and text-keyed maps.
pub fn diagnostic(input: &[u8]) -> Result<String, String> {
    let item: CborValue =
        ciborium::de::from_reader(input).map_err(|e| format!("CBOR decode error: {}", e))?;
    let mut out = String::new();
    diag_item(&mut out, &item, 0)?;
    out.push('\n');
    Ok(out)
}

fn diag_item(out: &mut String, item: &CborValue, depth: usize) -> Result<(), String> {
    match item {
        CborValue::Null => out.push_str("null"),
        CborValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        CborValue::Float(f) => diag_float(out, *f),
        CborValue::Text(s) => diag_text(out, s),
        CborValue::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
            } else if items.len() <= 5 && items.iter().all(is_scalar) {
                out.push('[');
                for (i, child) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    diag_item(out, child, depth)?;
                }
                out.push(']');
            } else {
                out.push_str("[\n");
                for (i, child) in items.iter().enumerate() {
                    indent(out, depth + 1);
                    diag_item(out, child, depth + 1)?;
                    out.push_str(if i + 1 < items.len() { ",\n" } else { "\n" });
                }
                indent(out, depth);
                out.push(']');
            }
        }
        CborValue::Map(pairs) => {
            if pairs.is_empty() {
                out.push_str("{}");
                return Ok(());
            }
            out.push_str("{\n");
            for (i, (key, child)) in pairs.iter().enumerate() {
                indent(out, depth + 1);
                diag_item(out, key, depth + 1)?;
                out.push_str(": ");
                diag_item(out, child, depth + 1)?;
                out.push_str(if i + 1 < pairs.len() { ",\n" } else { "\n" });
            }
            indent(out, depth);
            out.push('}');
        }
        other => return Err(format!("unsupported CBOR item {:?}", other)),
    }
    Ok(())
}

fn diag_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str("NaN");
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { "Infinity" } else { "-Infinity" });
    } else if f.fract() == 0.0 && f.abs() < 1e18 {
        // `{:.1}` keeps the sign of negative zero.
        let _ = write!(out, "{:.1}", f);
    } else {
        // Rust's `Debug` for f64 always carries a `.` or an exponent.
        let _ = write!(out, "{:?}", f);
    }
}

fn diag_text(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn indent(out: &mut String, depth: usize) {
    out.push_str(&"  ".repeat(depth));
}

fn is_scalar(item: &CborValue) -> bool {
    matches!(
        item,
        CborValue::Null | CborValue::Bool(_) | CborValue::Float(_) | CborValue::Text(_)
    )
}
