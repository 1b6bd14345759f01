//! Transcoders from parsed JSON values to other data formats.
//!
//! The parser keeps string text exactly as written, escapes included. Every
//! transcoder runs keys and strings through [`decode_string`] first, so the
//! target format carries the characters the JSON describes.

pub mod cbor;
pub mod toml;
pub mod yaml;

/// Largest magnitude below which every integral `f64` is exact.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// The number as an `i64` when it has no fractional part and is exactly
/// representable.
pub(crate) fn as_exact_integer(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Some(n as i64)
    } else {
        None
    }
}

/// Decode the JSON escapes in raw string text.
///
/// Handles `\" \\ \/ \b \f \n \r \t` and `\uXXXX`, joining surrogate pairs.
/// Unknown escapes and unpaired surrogates are errors.
pub(crate) fn decode_string(raw: &str) -> Result<String, String> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let high = hex4(&mut chars)?;
                let code = match high {
                    0xD800..=0xDBFF => {
                        if chars.next() != Some('\\') || chars.next() != Some('u') {
                            return Err(format!("unpaired surrogate \\u{:04X}", high));
                        }
                        let low = hex4(&mut chars)?;
                        if !(0xDC00..=0xDFFF).contains(&low) {
                            return Err(format!("unpaired surrogate \\u{:04X}", high));
                        }
                        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                    }
                    0xDC00..=0xDFFF => {
                        return Err(format!("unpaired surrogate \\u{:04X}", high));
                    }
                    _ => high,
                };
                match char::from_u32(code) {
                    Some(ch) => out.push(ch),
                    None => return Err(format!("invalid code point U+{:04X}", code)),
                }
            }
            Some(other) => return Err(format!("invalid escape \\{}", other)),
            None => return Err("string ends with a lone backslash".to_string()),
        }
    }
    Ok(out)
}

fn hex4(chars: &mut std::str::Chars<'_>) -> Result<u32, String> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid unicode escape \\u{}", digits));
    }
    u32::from_str_radix(&digits, 16).map_err(|e| e.to_string())
}
