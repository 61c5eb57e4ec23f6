//! The URI template mini-language.
//!
//! ```text
//! template     := host? path
//! host         := hostpart ('.' hostpart)*
//! hostpart     := text | variable | '[' hostpart ('.' hostpart)* '.' ']'
//! path         := ('/' segment)*
//! segment      := text | variable | '[' '/' segment+ ']'
//! variable     := ':' name ('(' constraint (',' constraint)* ')')?
//! constraint   := name ('(' param (',' param)* ')')?
//! ```
//!
//! [`lex`] turns a template into a [`TokenStream`], [`parse`] turns the stream
//! into an [`Ast`].

mod ast;
mod error;
mod lexer;
mod parser;
mod token;

pub use self::ast::{Ast, AstNode, AstNodeKind, AstValue, NodeId};
pub use self::error::{LexingError, UnexpectedTokenError};
pub use self::lexer::{lex, MAX_VARIABLE_NAME_LEN};
pub use self::parser::parse;
pub use self::token::{Number, Token, TokenKind, TokenStream};
