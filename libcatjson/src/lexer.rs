//! Pull-based lexer.
//!
//! The lexer walks a character stream strictly forward and hands out one
//! classified token per call. It keeps the raw text of the token it returned
//! last together with the line and column where that token began, which is
//! what the parser quotes back in error messages.

use crate::error::{LexFault, ParseError, Result};
use std::iter::Peekable;
use tracing::trace;

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// Numeric literal.
    Number,
    /// Quoted text, quotes included.
    String,
    /// Bare identifier that is not a keyword. No production accepts it.
    Word,
    /// End of input. Returned again on every later call.
    Eof,
}

impl TokenKind {
    /// Human-readable form used in "expected ..." messages.
    pub fn display(self) -> &'static str {
        match self {
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Word => "word",
            TokenKind::Eof => "end of input",
        }
    }
}

// JSON whitespace only; form feed and friends are not.
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenizer over any character source.
pub struct Lexer<I: Iterator<Item = char>> {
    chars: Peekable<I>,
    /// Position of the next unread character.
    line: usize,
    column: usize,
    /// Raw text and start position of the last token returned.
    text: String,
    token_line: usize,
    token_column: usize,
}

impl<I: Iterator<Item = char>> Lexer<I> {
    /// Create a lexer positioned at line 1, column 1.
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            chars: source.into_iter().peekable(),
            line: 1,
            column: 1,
            text: String::new(),
            token_line: 1,
            token_column: 1,
        }
    }

    /// Raw text of the token last returned by [`Lexer::next_token`].
    /// Empty for end of input.
    pub fn current_text(&self) -> &str {
        &self.text
    }

    /// Line where the last token began.
    pub fn current_line(&self) -> usize {
        self.token_line
    }

    /// Column where the last token began.
    pub fn current_column(&self) -> usize {
        self.token_column
    }

    /// Scan the next token.
    pub fn next_token(&mut self) -> Result<TokenKind> {
        self.skip_whitespace();
        self.text.clear();
        self.token_line = self.line;
        self.token_column = self.column;

        let kind = match self.chars.peek().copied() {
            None => TokenKind::Eof,
            Some('{') => self.single(TokenKind::LeftBrace),
            Some('}') => self.single(TokenKind::RightBrace),
            Some('[') => self.single(TokenKind::LeftBracket),
            Some(']') => self.single(TokenKind::RightBracket),
            Some(':') => self.single(TokenKind::Colon),
            Some(',') => self.single(TokenKind::Comma),
            Some('"') => self.scan_string()?,
            Some(c) if c == '-' || c.is_ascii_digit() => self.scan_number()?,
            Some(c) if c.is_ascii_alphabetic() => self.scan_word(),
            Some(c) => {
                return Err(ParseError::lex(
                    LexFault::UnexpectedChar(c),
                    self.line,
                    self.column,
                ))
            }
        };

        trace!(
            kind = ?kind,
            text = %self.text,
            line = self.token_line,
            column = self.token_column,
            "token"
        );
        Ok(kind)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume one character into the token text.
    fn take(&mut self) {
        if let Some(c) = self.bump() {
            self.text.push(c);
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.take();
        kind
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if !is_whitespace(c) {
                break;
            }
            self.bump();
        }
    }

    /// Quoted text up to the next unescaped quote. Escapes are kept as written.
    fn scan_string(&mut self) -> Result<TokenKind> {
        self.take();
        loop {
            match self.chars.peek().copied() {
                None => {
                    return Err(ParseError::lex(
                        LexFault::UnterminatedString,
                        self.token_line,
                        self.token_column,
                    ))
                }
                Some('"') => {
                    self.take();
                    return Ok(TokenKind::String);
                }
                Some('\\') => {
                    self.take();
                    match self.chars.peek().copied() {
                        Some(c) if (c as u32) < 0x20 => {
                            return Err(ParseError::lex(
                                LexFault::ControlCharInString(c as u32),
                                self.line,
                                self.column,
                            ))
                        }
                        Some(_) => self.take(),
                        None => {}
                    }
                }
                Some(c) if (c as u32) < 0x20 => {
                    return Err(ParseError::lex(
                        LexFault::ControlCharInString(c as u32),
                        self.line,
                        self.column,
                    ))
                }
                Some(_) => self.take(),
            }
        }
    }

    fn take_digits(&mut self) -> usize {
        let mut count = 0;
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.take();
            count += 1;
        }
        count
    }

    fn take_if(&mut self, pred: impl Fn(char) -> bool) -> bool {
        match self.chars.peek() {
            Some(&c) if pred(c) => {
                self.take();
                true
            }
            _ => false,
        }
    }

    /// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
    fn scan_number(&mut self) -> Result<TokenKind> {
        self.take_if(|c| c == '-');

        if !self.take_if(|c| c == '0') && self.take_digits() == 0 {
            return Err(self.malformed_number());
        }

        if self.take_if(|c| c == '.') && self.take_digits() == 0 {
            return Err(self.malformed_number());
        }

        if self.take_if(|c| c == 'e' || c == 'E') {
            self.take_if(|c| c == '+' || c == '-');
            if self.take_digits() == 0 {
                return Err(self.malformed_number());
            }
        }

        Ok(TokenKind::Number)
    }

    fn malformed_number(&self) -> ParseError {
        ParseError::lex(
            LexFault::MalformedNumber(self.text.clone()),
            self.token_line,
            self.token_column,
        )
    }

    fn scan_word(&mut self) -> TokenKind {
        while self.take_if(is_word_char) {}
        match self.text.as_str() {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Word,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input.chars());
        let mut out = Vec::new();
        loop {
            let kind = lexer.next_token().unwrap();
            if kind == TokenKind::Eof {
                return out;
            }
            out.push(kind);
        }
    }

    fn texts(input: &str) -> Vec<String> {
        let mut lexer = Lexer::new(input.chars());
        let mut out = Vec::new();
        while lexer.next_token().unwrap() != TokenKind::Eof {
            out.push(lexer.current_text().to_string());
        }
        out
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            kinds("{}[]:,"),
            vec![
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Colon,
                TokenKind::Comma,
            ]
        );
    }

    #[test]
    fn keywords_are_distinct_kinds() {
        assert_eq!(
            kinds("true false null"),
            vec![TokenKind::True, TokenKind::False, TokenKind::Null]
        );
    }

    #[test]
    fn other_words_are_words() {
        assert_eq!(kinds("garbage"), vec![TokenKind::Word]);
        assert_eq!(kinds("truthy"), vec![TokenKind::Word]);
        assert_eq!(texts("nul"), vec!["nul"]);
    }

    #[test]
    fn numbers() {
        assert_eq!(
            texts("0 -12 3.25 1e10 -2.5E-3 6e+2"),
            vec!["0", "-12", "3.25", "1e10", "-2.5E-3", "6e+2"]
        );
        assert!(kinds("-0.5").iter().all(|k| *k == TokenKind::Number));
    }

    #[test]
    fn leading_zero_splits_into_two_numbers() {
        assert_eq!(texts("01"), vec!["0", "1"]);
    }

    #[test]
    fn malformed_numbers() {
        for input in ["-", "1.", "2e", "3e+", "-x"] {
            let mut lexer = Lexer::new(input.chars());
            match lexer.next_token() {
                Err(ParseError::Lex {
                    fault: LexFault::MalformedNumber(_),
                    ..
                }) => {}
                other => panic!("{input:?}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn string_keeps_quotes_and_escapes() {
        assert_eq!(texts(r#""hello""#), vec![r#""hello""#]);
        assert_eq!(texts(r#""a\"b\\n""#), vec![r#""a\"b\\n""#]);
        assert_eq!(texts(r#""line\nbreak""#), vec![r#""line\nbreak""#]);
    }

    #[test]
    fn unterminated_string_points_at_opening_quote() {
        let mut lexer = Lexer::new("  \"abc".chars());
        let err = lexer.next_token().unwrap_err();
        assert_eq!(
            err,
            ParseError::lex(LexFault::UnterminatedString, 1, 3)
        );
    }

    #[test]
    fn raw_newline_in_string_is_rejected() {
        let mut lexer = Lexer::new("\"ab\ncd\"".chars());
        let err = lexer.next_token().unwrap_err();
        assert_eq!(
            err,
            ParseError::lex(LexFault::ControlCharInString(0x0a), 1, 4)
        );
    }

    #[test]
    fn unexpected_character() {
        let mut lexer = Lexer::new("[\n @".chars());
        assert_eq!(lexer.next_token().unwrap(), TokenKind::LeftBracket);
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err, ParseError::lex(LexFault::UnexpectedChar('@'), 2, 2));
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let mut lexer = Lexer::new("{\n  \"a\": 1\n}".chars());
        let mut seen = Vec::new();
        while lexer.next_token().unwrap() != TokenKind::Eof {
            seen.push((
                lexer.current_text().to_string(),
                lexer.current_line(),
                lexer.current_column(),
            ));
        }
        assert_eq!(
            seen,
            vec![
                ("{".to_string(), 1, 1),
                ("\"a\"".to_string(), 2, 3),
                (":".to_string(), 2, 6),
                ("1".to_string(), 2, 8),
                ("}".to_string(), 3, 1),
            ]
        );
    }

    #[test]
    fn end_of_input_is_idempotent() {
        let mut lexer = Lexer::new("[] ".chars());
        assert_eq!(lexer.next_token().unwrap(), TokenKind::LeftBracket);
        assert_eq!(lexer.next_token().unwrap(), TokenKind::RightBracket);
        for _ in 0..5 {
            assert_eq!(lexer.next_token().unwrap(), TokenKind::Eof);
            assert_eq!(lexer.current_text(), "");
            assert_eq!((lexer.current_line(), lexer.current_column()), (1, 4));
        }
    }

    #[test]
    fn display_table() {
        assert_eq!(TokenKind::Colon.display(), ":");
        assert_eq!(TokenKind::String.display(), "string");
        assert_eq!(TokenKind::Eof.display(), "end of input");
    }
}
