use super::error::UnexpectedTokenError;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,
    Number,
    Punctuation,
    QuotedString,
    Variable,
    Eof,
}

/// A lexed token.
///
/// Number tokens keep their source lexeme so that `/api/1.0` still reads as
/// `1.0` when the parser treats the number as plain text. Use [`Token::number`]
/// for the numeric value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    value: Box<str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<Box<str>>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is(&self, kind: TokenKind, value: Option<&str>) -> bool {
        self.kind == kind && value.map_or(true, |v| &*self.value == v)
    }

    pub fn is_punctuation(&self, c: &str) -> bool {
        self.is(TokenKind::Punctuation, Some(c))
    }

    /// A float is only produced when the fractional part is not zero, so `2.0`
    /// reads as `Int(2)`.
    pub fn number(&self) -> Option<Number> {
        if self.kind != TokenKind::Number {
            return None;
        }
        if self.value.contains('.') {
            let f: f64 = self.value.parse().ok()?;
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                return Some(Number::Int(f as i64));
            }
            return Some(Number::Float(f));
        }
        match self.value.parse::<i64>() {
            Ok(i) => Some(Number::Int(i)),
            Err(_) => self.value.parse().ok().map(Number::Float),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end of template"),
            kind => write!(f, "{:?} {:?}", kind, self.value),
        }
    }
}

/// Tokens plus a cursor. The last token is always [`TokenKind::Eof`], and the
/// cursor never moves past it.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            tokens.push(Token::eof());
        }
        Self { tokens, cursor: 0 }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn current(&self) -> &Token {
        self.at(self.cursor)
    }

    pub fn peek(&self) -> &Token {
        self.at(self.cursor + 1)
    }

    pub fn advance(&mut self) -> &Token {
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
        }
        self.current()
    }

    pub fn is_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    pub fn test(&self, kind: TokenKind, value: Option<&str>) -> bool {
        self.current().is(kind, value)
    }

    pub fn expect(
        &self,
        kind: TokenKind,
        value: Option<&str>,
        msg: &'static str,
    ) -> Result<&Token, UnexpectedTokenError> {
        let current = self.current();
        if current.is(kind, value) {
            Ok(current)
        } else {
            Err(UnexpectedTokenError::new(msg, current.clone()))
        }
    }

    /// Advances past the current token if it matches.
    pub fn next_if(&mut self, kind: TokenKind, value: Option<&str>) -> bool {
        let matched = self.test(kind, value);
        if matched {
            self.advance();
        }
        matched
    }

    /// The tokens from the cursor onwards, trailing Eof included.
    pub fn into_remaining(mut self) -> Vec<Token> {
        self.tokens.split_off(self.cursor)
    }

    fn at(&self, i: usize) -> &Token {
        // tokens is never empty
        &self.tokens[i.min(self.tokens.len() - 1)]
    }
}
