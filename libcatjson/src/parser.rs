//! Recursive-descent parser.
//!
//! Each grammar rule is one method; the call stack is the only parser state
//! besides the single lookahead token.
//!
//! ```text
//! start       := array | object
//! array       := '[' arrayValues ']'
//! arrayValues := entryValue (',' entryValue)* | ε
//! object      := '{' entries '}'
//! entries     := entry (',' entry)* | ε
//! entry       := STRING ':' entryValue
//! entryValue  := TRUE | FALSE | NULL | NUMBER | STRING | object | array
//! ```

use crate::error::{LexFault, ParseError, Result};
use crate::lexer::{Lexer, TokenKind};
use crate::value::Value;
use std::collections::HashMap;
use tracing::debug;

/// Parser over a character source. One instance parses one document.
pub struct Parser<I: Iterator<Item = char>> {
    lexer: Lexer<I>,
    lookahead: TokenKind,
}

impl<I: Iterator<Item = char>> Parser<I> {
    /// Create a parser that owns a fresh lexer over `source`.
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            lexer: Lexer::new(source),
            lookahead: TokenKind::Eof,
        }
    }

    /// Parse the whole source as one JSON document.
    ///
    /// Fails on the first lexical or syntax error. Anything but whitespace
    /// after the root value is an error.
    pub fn parse(mut self) -> Result<Value> {
        debug!("parse started");
        let result = self.document();
        match &result {
            Ok(value) => debug!(root = value.kind(), "parse finished"),
            Err(e) => debug!(error = %e, "parse aborted"),
        }
        result
    }

    fn document(&mut self) -> Result<Value> {
        self.advance()?;
        let value = self.start()?;
        if self.lookahead != TokenKind::Eof {
            return Err(self.unexpected(TokenKind::Eof));
        }
        Ok(value)
    }

    // ========================================================================
    // Token matching
    // ========================================================================

    fn advance(&mut self) -> Result<()> {
        self.lookahead = self.lexer.next_token()?;
        Ok(())
    }

    fn unexpected(&self, expected: TokenKind) -> ParseError {
        ParseError::syntax(
            expected.display(),
            self.lexer.current_text(),
            self.lexer.current_line(),
            self.lexer.current_column(),
        )
    }

    /// Require the lookahead to be `kind` and move past it.
    fn match_token(&mut self, kind: TokenKind) -> Result<()> {
        if self.lookahead != kind {
            return Err(self.unexpected(kind));
        }
        self.advance()
    }

    /// Like [`Parser::match_token`], returning the matched text.
    fn get_match(&mut self, kind: TokenKind) -> Result<String> {
        if self.lookahead != kind {
            return Err(self.unexpected(kind));
        }
        let text = self.lexer.current_text().to_string();
        self.advance()?;
        Ok(text)
    }

    /// Consume the lookahead only if it is `kind`.
    fn try_match(&mut self, kind: TokenKind) -> Result<Option<String>> {
        if self.lookahead != kind {
            return Ok(None);
        }
        let text = self.lexer.current_text().to_string();
        self.advance()?;
        Ok(Some(text))
    }

    // ========================================================================
    // Productions
    // ========================================================================

    fn start(&mut self) -> Result<Value> {
        if self.lookahead == TokenKind::LeftBrace {
            self.object()
        } else {
            self.array()
        }
    }

    fn array(&mut self) -> Result<Value> {
        self.match_token(TokenKind::LeftBracket)?;

        let mut items = Vec::new();
        if self.try_match(TokenKind::RightBracket)?.is_some() {
            return Ok(Value::Array(items));
        }

        items.push(self.entry_value()?);
        while self.try_match(TokenKind::Comma)?.is_some() {
            items.push(self.entry_value()?);
        }
        self.match_token(TokenKind::RightBracket)?;

        Ok(Value::Array(items))
    }

    fn object(&mut self) -> Result<Value> {
        self.match_token(TokenKind::LeftBrace)?;

        let mut entries = HashMap::new();
        if self.try_match(TokenKind::RightBrace)?.is_some() {
            return Ok(Value::Object(entries));
        }

        self.entry(&mut entries)?;
        while self.try_match(TokenKind::Comma)?.is_some() {
            self.entry(&mut entries)?;
        }
        self.match_token(TokenKind::RightBrace)?;

        Ok(Value::Object(entries))
    }

    fn entry(&mut self, entries: &mut HashMap<String, Value>) -> Result<()> {
        let key = self.get_match(TokenKind::String)?;
        self.match_token(TokenKind::Colon)?;
        let value = self.entry_value()?;
        // Last write wins.
        entries.insert(strip_quotes(&key).to_string(), value);
        Ok(())
    }

    fn entry_value(&mut self) -> Result<Value> {
        match self.lookahead {
            TokenKind::True => {
                self.advance()?;
                Ok(Value::Bool(true))
            }
            TokenKind::False => {
                self.advance()?;
                Ok(Value::Bool(false))
            }
            TokenKind::Null => {
                self.advance()?;
                Ok(Value::Null)
            }
            TokenKind::Number => self.number(),
            TokenKind::String => {
                let text = self.get_match(TokenKind::String)?;
                Ok(Value::String(strip_quotes(&text).to_string()))
            }
            TokenKind::LeftBrace => self.object(),
            // Only `array` is left; its opening match reports anything else.
            _ => self.array(),
        }
    }

    fn number(&mut self) -> Result<Value> {
        let line = self.lexer.current_line();
        let column = self.lexer.current_column();
        let text = self.get_match(TokenKind::Number)?;
        match text.parse::<f64>() {
            Ok(n) => Ok(Value::Number(n)),
            Err(_) => Err(ParseError::lex(LexFault::MalformedNumber(text), line, column)),
        }
    }
}

fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}
