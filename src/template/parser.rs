use super::ast::{Ast, AstNodeKind, AstValue, NodeId};
use super::error::UnexpectedTokenError;
use super::token::{Number, Token, TokenKind, TokenStream};

use crate::rules::RuleParam;

type ParseResult<T> = Result<T, UnexpectedTokenError>;

/// Builds the syntax tree of a template.
///
/// Tokens before the first `/` belong to the host when any of them is more
/// than a bracket. A template without `/` is host-only and gets an empty path.
pub fn parse(tokens: TokenStream) -> ParseResult<Ast> {
    let mut ast = Ast::new();
    let root = ast.root();
    let mut tokens = tokens.into_remaining();

    let mut has_host = false;
    let mut slash = None;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind() {
            TokenKind::Eof => break,
            TokenKind::Punctuation if token.value() == "/" => {
                slash = Some(i);
                break;
            }
            TokenKind::Punctuation if matches!(token.value(), "[" | "]") => {}
            _ => has_host = true,
        }
    }

    if !has_host {
        parse_path(&mut ast, root, TokenStream::new(tokens))?;
        return Ok(ast);
    }

    let path_tokens = match slash {
        Some(i) => tokens.split_off(i),
        None => Vec::new(),
    };
    parse_host(&mut ast, root, TokenStream::new(tokens))?;
    parse_path(&mut ast, root, TokenStream::new(path_tokens))?;
    Ok(ast)
}

fn parse_path(ast: &mut Ast, root: NodeId, mut tokens: TokenStream) -> ParseResult<()> {
    let path = ast.add_child(root, AstNodeKind::Path, AstValue::None);
    let mut current = path;

    while !tokens.is_eof() {
        let token = tokens.current().clone();
        current = match token.kind() {
            TokenKind::Punctuation => parse_path_punctuation(ast, current, &mut tokens)?,
            TokenKind::Variable => parse_variable(ast, current, &mut tokens)?,
            _ => {
                tokens.advance();
                push_text(ast, current, &token);
                current
            }
        };
    }

    if current != path {
        return Err(UnexpectedTokenError::new(
            "expected optional path part to end with ']'",
            tokens.current().clone(),
        ));
    }
    Ok(())
}

fn parse_path_punctuation(
    ast: &mut Ast,
    current: NodeId,
    tokens: &mut TokenStream,
) -> ParseResult<NodeId> {
    let token = tokens.current().clone();
    tokens.advance();

    match token.value() {
        "/" => {
            ast.add_child(current, AstNodeKind::SegmentDelimiter, text("/"));
            Ok(current)
        }
        "[" => {
            tokens.expect(
                TokenKind::Punctuation,
                Some("/"),
                "expected optional path part to start with '/'",
            )?;
            Ok(ast.add_child(current, AstNodeKind::OptionalRoutePart, AstValue::None))
        }
        "]" if ast.node(current).kind() == AstNodeKind::OptionalRoutePart => {
            Ok(ast.node(current).parent().unwrap_or(current))
        }
        // periods, stray ']' and parentheses are literal in paths
        _ => {
            push_text(ast, current, &token);
            Ok(current)
        }
    }
}

fn parse_host(ast: &mut Ast, root: NodeId, mut tokens: TokenStream) -> ParseResult<()> {
    let host = ast.add_child(root, AstNodeKind::Host, AstValue::None);
    let mut current = host;

    while !tokens.is_eof() {
        let token = tokens.current().clone();
        current = match token.kind() {
            TokenKind::Punctuation => parse_host_punctuation(ast, current, &mut tokens)?,
            TokenKind::Variable => parse_variable(ast, current, &mut tokens)?,
            TokenKind::Number => {
                tokens.advance();
                push_host_number(ast, current, &token);
                current
            }
            _ => {
                tokens.advance();
                push_text(ast, current, &token);
                current
            }
        };
    }

    if current != host {
        return Err(UnexpectedTokenError::new(
            "expected optional host part to end with ']'",
            tokens.current().clone(),
        ));
    }
    Ok(())
}

fn parse_host_punctuation(
    ast: &mut Ast,
    current: NodeId,
    tokens: &mut TokenStream,
) -> ParseResult<NodeId> {
    let token = tokens.current().clone();

    match token.value() {
        "." => {
            tokens.advance();
            ast.add_child(current, AstNodeKind::SegmentDelimiter, text("."));
            Ok(current)
        }
        "[" => {
            tokens.advance();
            Ok(ast.add_child(current, AstNodeKind::OptionalRoutePart, AstValue::None))
        }
        "]" => {
            if ast.node(current).kind() != AstNodeKind::OptionalRoutePart {
                return Err(UnexpectedTokenError::new(
                    "unexpected ']' outside of an optional host part",
                    token,
                ));
            }
            let ends_with_period = ast
                .last_child(current)
                .map_or(false, |n| n.kind() == AstNodeKind::SegmentDelimiter);
            if !ends_with_period {
                return Err(UnexpectedTokenError::new(
                    "expected optional host part to end with '.'",
                    token,
                ));
            }
            tokens.advance();
            Ok(ast.node(current).parent().unwrap_or(current))
        }
        _ => {
            tokens.advance();
            push_text(ast, current, &token);
            Ok(current)
        }
    }
}

fn parse_variable(ast: &mut Ast, current: NodeId, tokens: &mut TokenStream) -> ParseResult<NodeId> {
    let token = tokens.current().clone();

    let follows_variable = ast
        .last_child(current)
        .map_or(false, |n| n.kind() == AstNodeKind::Variable);
    if follows_variable {
        return Err(UnexpectedTokenError::new(
            "cannot have consecutive variables without a delimiter",
            token,
        ));
    }

    tokens.advance();
    let variable = ast.add_child(current, AstNodeKind::Variable, text(token.value()));

    if tokens.next_if(TokenKind::Punctuation, Some("(")) {
        parse_constraints(ast, variable, tokens)?;
    }
    Ok(current)
}

fn parse_constraints(ast: &mut Ast, variable: NodeId, tokens: &mut TokenStream) -> ParseResult<()> {
    loop {
        let name = tokens
            .expect(TokenKind::Text, None, "expected variable constraint name")?
            .clone();
        tokens.advance();
        let constraint = ast.add_child(variable, AstNodeKind::VariableConstraint, text(name.value()));

        if tokens.next_if(TokenKind::Punctuation, Some("(")) {
            let params = parse_constraint_parameters(tokens)?;
            ast.add_child(
                constraint,
                AstNodeKind::VariableConstraintParameters,
                AstValue::Parameters(params),
            );
        }

        if tokens.next_if(TokenKind::Punctuation, Some(",")) {
            continue;
        }
        tokens.expect(
            TokenKind::Punctuation,
            Some(")"),
            "expected ')' after variable constraints",
        )?;
        tokens.advance();
        return Ok(());
    }
}

fn parse_constraint_parameters(tokens: &mut TokenStream) -> ParseResult<Vec<RuleParam>> {
    let mut params = Vec::new();
    if tokens.next_if(TokenKind::Punctuation, Some(")")) {
        return Ok(params);
    }

    loop {
        let token = tokens.current();
        let param = match (token.kind(), token.number()) {
            (TokenKind::Number, Some(Number::Int(i))) => RuleParam::Int(i),
            (TokenKind::Number, Some(Number::Float(f))) => RuleParam::Float(f),
            (TokenKind::QuotedString, _) | (TokenKind::Text, _) => {
                RuleParam::Str(token.value().to_owned())
            }
            _ => {
                return Err(UnexpectedTokenError::new(
                    "expected constraint parameter",
                    token.clone(),
                ))
            }
        };
        params.push(param);
        tokens.advance();

        if tokens.next_if(TokenKind::Punctuation, Some(",")) {
            continue;
        }
        tokens.expect(
            TokenKind::Punctuation,
            Some(")"),
            "expected ')' after constraint parameters",
        )?;
        tokens.advance();
        return Ok(params);
    }
}

/// `127.0` lexes as one number, but in a host its period separates labels.
fn push_host_number(ast: &mut Ast, current: NodeId, token: &Token) {
    for (i, label) in token.value().split('.').enumerate() {
        if i > 0 {
            ast.add_child(current, AstNodeKind::SegmentDelimiter, text("."));
        }
        ast.add_child(current, AstNodeKind::Text, text(label));
    }
}

fn push_text(ast: &mut Ast, current: NodeId, token: &Token) {
    ast.add_child(current, AstNodeKind::Text, text(token.value()));
}

fn text(s: &str) -> AstValue {
    AstValue::Text(s.into())
}
