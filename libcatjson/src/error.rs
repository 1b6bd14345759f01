//! Error types for JSON parsing.

use std::fmt;
use thiserror::Error;

/// Result type for JSON parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// A 1-based line and column in the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}, column {}]", self.line, self.column)
    }
}

/// What went wrong while tokenizing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexFault {
    /// A character that cannot start any token.
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),

    /// End of input before the closing quote.
    #[error("unterminated string")]
    UnterminatedString,

    /// A raw control character between quotes.
    #[error("control character U+{0:04X} in string")]
    ControlCharInString(u32),

    /// A numeric literal missing its digits.
    #[error("malformed number '{0}'")]
    MalformedNumber(String),
}

/// Error type for JSON parsing.
///
/// Both variants abort the parse; callers that only care whether a document
/// is valid can treat them alike and print the message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The lexer could not produce a token.
    #[error("{fault} {position}")]
    Lex { fault: LexFault, position: Position },

    /// The lookahead token does not fit the current grammar production.
    #[error("expected {expected} but found {found} {position}")]
    Syntax {
        expected: String,
        found: String,
        position: Position,
    },
}

impl ParseError {
    pub(crate) fn lex(fault: LexFault, line: usize, column: usize) -> Self {
        ParseError::Lex {
            fault,
            position: Position::new(line, column),
        }
    }

    pub(crate) fn syntax(expected: &str, found: &str, line: usize, column: usize) -> Self {
        let found = if found.is_empty() {
            "end of input".to_string()
        } else {
            found.to_string()
        };
        ParseError::Syntax {
            expected: expected.to_string(),
            found,
            position: Position::new(line, column),
        }
    }

    /// Where in the source the error was detected.
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex { position, .. } | ParseError::Syntax { position, .. } => *position,
        }
    }

    /// Returns `true` for grammar violations, `false` for lexical ones.
    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax { .. })
    }
}
