use super::token::Token;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexingError {
    #[error("variable name {name:?} cannot be longer than {max} characters")]
    VariableNameTooLong { name: String, max: usize },

    #[error("unterminated quoted string at offset {offset}")]
    UnterminatedString { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{msg}, found {found}")]
pub struct UnexpectedTokenError {
    msg: &'static str,
    found: Token,
}

impl UnexpectedTokenError {
    pub(super) fn new(msg: &'static str, found: Token) -> Self {
        Self { msg, found }
    }

    pub fn message(&self) -> &str {
        self.msg
    }

    pub fn found(&self) -> &Token {
        &self.found
    }
}
