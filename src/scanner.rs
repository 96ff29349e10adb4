// src/scanner.rs
use crate::errors::{ErrorKind, EvalError, Found};

/// Cursor over the expression text.
///
/// Positions are byte offsets; everything the grammar accepts is ASCII, so any other
/// character simply fails classification.
pub(crate) struct Scanner<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    /// Step over the current character, if any.
    pub fn bump(&mut self) {
        if let Some(c) = self.peek_char() {
            self.i += c.len_utf8();
        }
    }

    /// Consume and return the current character when `pred` accepts it.
    pub fn consume_if(&mut self, pred: impl FnOnce(char) -> bool) -> Option<char> {
        let c = self.peek_char().filter(|&c| pred(c))?;
        self.i += c.len_utf8();
        Some(c)
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        self.consume_if(|x| x == c).is_some()
    }

    pub fn skip_ws(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek_char() {
            self.i += 1;
        }
    }

    pub fn is_digit(&self) -> bool {
        matches!(self.peek_char(), Some('0'..='9'))
    }

    pub fn is_alpha(&self) -> bool {
        matches!(self.peek_char(), Some('a'..='z' | 'A'..='Z' | '_'))
    }

    pub fn is_unit_char(&self) -> bool {
        self.is_alpha() || self.peek_char() == Some('%')
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Consume an identifier: a letter or `_`, then letters, digits or `_`.
    pub fn take_identifier(&mut self) -> &'a str {
        let start = self.i;
        if self.is_alpha() {
            self.i += 1;
            while self.is_alpha() || self.is_digit() {
                self.i += 1;
            }
        }
        &self.s[start..self.i]
    }

    /// Consume a unit suffix: letters, `_` and `%`.
    pub fn take_unit(&mut self) -> &'a str {
        let start = self.i;
        while self.is_unit_char() {
            self.i += 1;
        }
        &self.s[start..self.i]
    }

    /// Value of the digit under the cursor, consuming it.
    pub fn take_digit(&mut self) -> Option<u8> {
        let d = self.peek_char()?.to_digit(10)?;
        self.i += 1;
        Some(d as u8)
    }

    /// Offset reported in error messages: one before the cursor.
    pub fn offset(&self) -> isize {
        self.i as isize - 1
    }

    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    pub fn error(&self, kind: ErrorKind) -> EvalError {
        let found = if self.eof() {
            Found::EndOfString
        } else {
            Found::Text(self.rest().to_string())
        };
        EvalError {
            offset: self.offset(),
            kind,
            found,
        }
    }

    pub fn error_at(&self, kind: ErrorKind, identifier: &str) -> EvalError {
        EvalError {
            offset: self.offset(),
            kind,
            found: Found::Identifier(identifier.to_string()),
        }
    }
}
