use super::error::LexingError;
use super::token::{Token, TokenKind, TokenStream};

pub const MAX_VARIABLE_NAME_LEN: usize = 32;

const PUNCTUATION: &[char] = &['.', '(', ')', '[', ']', ',', '/'];

/// Splits a template into tokens.
///
/// Spaces are skipped. Digits only start a number token at a token boundary,
/// so `v1` and `uuidv4` stay plain text. Quotes only start a quoted string
/// inside the parentheses that follow a variable; elsewhere they are text.
pub fn lex(template: &str) -> Result<TokenStream, LexingError> {
    let mut lexer = Lexer {
        src: template,
        pos: 0,
        depth: 0,
        text: String::new(),
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(TokenStream::new(lexer.tokens))
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    /// Nesting of the constraint list after a variable.
    depth: usize,
    text: String,
    tokens: Vec<Token>,
}

impl Lexer<'_> {
    fn run(&mut self) -> Result<(), LexingError> {
        while let Some(c) = self.peek_char() {
            match c {
                ' ' => self.pos += 1,
                c if PUNCTUATION.contains(&c) => {
                    self.track_depth(c);
                    self.pos += 1;
                    self.push(TokenKind::Punctuation, c.to_string());
                }
                ':' => self.lex_variable()?,
                '"' | '\'' if self.depth > 0 => self.lex_quoted_string(c)?,
                c if c.is_ascii_digit() && self.text.is_empty() => self.lex_number(),
                c => {
                    self.pos += c.len_utf8();
                    self.text.push(c);
                }
            }
        }
        self.flush_text();
        Ok(())
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn track_depth(&mut self, c: char) {
        match c {
            '(' if self.depth > 0 || self.follows_variable() => self.depth += 1,
            ')' if self.depth > 0 => self.depth -= 1,
            _ => {}
        }
    }

    fn follows_variable(&self) -> bool {
        self.text.is_empty()
            && self
                .tokens
                .last()
                .map_or(false, |t| t.kind() == TokenKind::Variable)
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.tokens.push(Token::new(TokenKind::Text, text));
        }
    }

    fn push(&mut self, kind: TokenKind, value: String) {
        self.flush_text();
        self.tokens.push(Token::new(kind, value));
    }

    fn lex_variable(&mut self) -> Result<(), LexingError> {
        let name = &self.rest()[1..];
        let starts_ok = name
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_alphabetic() || c == '_');
        if !starts_ok {
            // a lone ':' is ordinary text
            self.pos += 1;
            self.text.push(':');
            return Ok(());
        }

        let len = name
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(name.len());
        if len > MAX_VARIABLE_NAME_LEN {
            return Err(LexingError::VariableNameTooLong {
                name: name[..len].to_owned(),
                max: MAX_VARIABLE_NAME_LEN,
            });
        }

        let name = name[..len].to_owned();
        self.pos += 1 + len;
        self.push(TokenKind::Variable, name);
        Ok(())
    }

    fn lex_number(&mut self) {
        let rest = self.rest();
        let int_len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let mut len = int_len;

        let tail = &rest[int_len..];
        if let Some(frac) = tail.strip_prefix('.') {
            let frac_len = frac
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(frac.len());
            if frac_len > 0 {
                len += 1 + frac_len;
            }
        }

        let lexeme = rest[..len].to_owned();
        self.pos += len;
        self.push(TokenKind::Number, lexeme);
    }

    fn lex_quoted_string(&mut self, quote: char) -> Result<(), LexingError> {
        let start = self.pos;
        let mut value = String::new();
        let mut chars = self.rest()[1..].char_indices();

        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, escaped)) => value.push(escaped),
                    None => break,
                },
                c if c == quote => {
                    // opening quote + content + closing quote
                    self.pos += 1 + i + c.len_utf8();
                    self.push(TokenKind::QuotedString, value);
                    return Ok(());
                }
                c => value.push(c),
            }
        }

        Err(LexingError::UnterminatedString { offset: start })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(template: &str) -> Vec<(TokenKind, String)> {
        lex(template)
            .unwrap()
            .tokens()
            .iter()
            .map(|t| (t.kind(), t.value().to_owned()))
            .collect()
    }

    #[test]
    fn text_is_flushed_before_other_tokens() {
        assert_eq!(
            kinds("/foo-:bar.json"),
            vec![
                (TokenKind::Punctuation, "/".into()),
                (TokenKind::Text, "foo-".into()),
                (TokenKind::Variable, "bar".into()),
                (TokenKind::Punctuation, ".".into()),
                (TokenKind::Text, "json".into()),
                (TokenKind::Eof, "".into()),
            ]
        );
    }

    #[test]
    fn digits_inside_text_stay_text() {
        assert_eq!(
            kinds(":id(uuidv4)")[2],
            (TokenKind::Text, "uuidv4".into())
        );
        assert_eq!(kinds("/v1")[1], (TokenKind::Text, "v1".into()));
    }

    #[test]
    fn quoted_strings_are_unescaped() {
        let tokens = kinds(r#":v(in("a\"b", 'c'))"#);
        assert_eq!(tokens[4], (TokenKind::QuotedString, "a\"b".into()));
        assert_eq!(tokens[6], (TokenKind::QuotedString, "c".into()));
        assert_eq!(
            lex(":v(in('open))").unwrap_err(),
            LexingError::UnterminatedString { offset: 6 }
        );
    }

    #[test]
    fn quotes_outside_constraints_are_text() {
        assert_eq!(
            kinds("/o'reilly/\"b\""),
            vec![
                (TokenKind::Punctuation, "/".into()),
                (TokenKind::Text, "o'reilly".into()),
                (TokenKind::Punctuation, "/".into()),
                (TokenKind::Text, "\"b\"".into()),
                (TokenKind::Eof, "".into()),
            ]
        );
        // parentheses not opened by a variable do not start a constraint list
        assert_eq!(kinds("/('x')")[2], (TokenKind::Text, "'x'".into()));
    }

    #[test]
    fn numbers_keep_their_lexeme() {
        let stream = lex("1.0 2.5 3.").unwrap();
        let tokens = stream.tokens();
        assert_eq!(tokens[0].value(), "1.0");
        assert_eq!(tokens[0].number(), Some(crate::template::Number::Int(1)));
        assert_eq!(tokens[1].number(), Some(crate::template::Number::Float(2.5)));
        assert_eq!(tokens[2].value(), "3");
        assert!(tokens[3].is_punctuation("."));
    }
}
