//! Outline rendering of a value tree.
//!
//! Every key and every scalar gets its own line. Keys sit at their object's
//! depth and their values one level deeper; array elements stay at the depth
//! of the array itself. Each level indents by four spaces.
//!
//! ```text
//! {"name": "cat", "tags": ["a", "b"]}
//! ```
//!
//! renders as
//!
//! ```text
//! name
//!     cat
//! tags
//!     a
//!     b
//! ```

use crate::Value;
use std::io;

const INDENT: &str = "    ";

/// Render `value` as an outline.
pub fn outline(value: &Value) -> String {
    let mut out = String::new();
    walk(&mut out, value, 0);
    out
}

/// Render `value` as an outline into `out`.
pub fn write_outline<W: io::Write>(value: &Value, out: &mut W) -> io::Result<()> {
    out.write_all(outline(value).as_bytes())
}

fn walk(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Object(obj) => {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            for k in keys {
                line(out, k, depth);
                walk(out, &obj[k], depth + 1);
            }
        }
        Value::Array(arr) => {
            for item in arr {
                walk(out, item, depth);
            }
        }
        Value::Null => line(out, "null", depth),
        Value::Bool(b) => line(out, &b.to_string(), depth),
        Value::Number(n) => line(out, &n.to_string(), depth),
        Value::String(s) => line(out, s, depth),
    }
}

fn line(out: &mut String, text: &str, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    // Strings keep their escapes, so a literal `\n` is display noise here.
    out.push_str(text.replace("\\n", "").trim());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn keys_then_values_one_level_deeper() {
        let v = parse(r#"{"name": "cat", "tags": ["a", "b"]}"#).unwrap();
        assert_eq!(outline(&v), "name\n    cat\ntags\n    a\n    b\n");
    }

    #[test]
    fn nested_objects_indent_further() {
        let v = parse(r#"[{"outer": {"inner": 1.5}}, true, null]"#).unwrap();
        assert_eq!(
            outline(&v),
            "outer\n    inner\n        1.5\ntrue\nnull\n"
        );
    }

    #[test]
    fn escaped_newlines_and_padding_are_stripped() {
        let v = parse(r#"["  first\nsecond  ", "\\n"]"#).unwrap();
        assert_eq!(outline(&v), "firstsecond\n\\\n");
    }

    #[test]
    fn empty_containers_print_nothing() {
        assert_eq!(outline(&parse("[]").unwrap()), "");
        assert_eq!(outline(&parse(r#"{"a": {}}"#).unwrap()), "a\n");
    }

    #[test]
    fn writer_gets_the_same_text() {
        let v = parse(r#"{"k": [1, 2]}"#).unwrap();
        let mut buf = Vec::new();
        write_outline(&v, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), outline(&v));
    }
}
