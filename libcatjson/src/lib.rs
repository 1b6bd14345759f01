//! JSON parser producing a generic value tree.
//!
//! # Parsing Pipeline
//!
//! 1. **Lexer**: Pulls characters from the source one at a time and hands out
//!    classified tokens, remembering the raw text and position of the last one.
//!
//! 2. **Parser**: Recursive descent with a single token of lookahead. Each
//!    grammar rule is one method; the first error aborts the parse.
//!
//! The document root must be an array or an object. Strings keep their
//! source text verbatim between the quotes (escapes are not decoded) and all
//! numbers become `f64`.

mod encode;
mod error;
mod lexer;
mod outline;
mod parser;
mod value;

pub use encode::{encode, Format};
pub use error::{LexFault, ParseError, Position, Result};
pub use lexer::{Lexer, TokenKind};
pub use outline::{outline, write_outline};
pub use parser::Parser;
pub use value::Value;

/// Parse a JSON document from a string.
///
/// # Example
///
/// ```
/// use libcatjson::{parse, Value};
///
/// let value = parse(r#"{"answer": [42]}"#).unwrap();
/// assert_eq!(value.get("answer"), Some(&Value::Array(vec![Value::Number(42.0)])));
/// ```
pub fn parse(input: &str) -> Result<Value> {
    Parser::new(input.chars()).parse()
}

/// Check that a string is a valid JSON document without keeping the tree.
pub fn check(input: &str) -> Result<()> {
    parse(input).map(|_| ())
}
