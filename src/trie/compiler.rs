use super::{RouteVariable, SegmentPart, TrieNode, VariableSegment};

use crate::config::RouterConfig;
use crate::router::{Route, RouterError};
use crate::rules::{RuleFactory, RuleSpec};
use crate::template::{Ast, AstNodeKind, NodeId};

use std::sync::Arc;

#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Variable(RouteVariable),
}

/// One concrete shape of a template, with every optional part either taken
/// or left out.
#[derive(Debug, Clone)]
struct Form {
    segments: Vec<Vec<Piece>>,
    open: bool,
}

impl Form {
    fn new() -> Self {
        Self {
            segments: Vec::new(),
            open: true,
        }
    }

    fn push(&mut self, piece: Piece) {
        if self.open || self.segments.is_empty() {
            self.segments.push(Vec::new());
            self.open = false;
        }
        if let Some(segment) = self.segments.last_mut() {
            segment.push(piece);
        }
    }
}

#[derive(Debug, Clone)]
enum Key {
    Literal(Box<str>),
    Variable(VariableSegment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Host,
    Path,
}

/// Compiles route syntax trees into a shared trie.
pub(crate) struct TrieCompiler<'a> {
    rules: &'a RuleFactory,
    config: &'a RouterConfig,
}

impl<'a> TrieCompiler<'a> {
    pub(crate) fn new(rules: &'a RuleFactory, config: &'a RouterConfig) -> Self {
        Self { rules, config }
    }

    /// Merges `route` into the trie under `root` and returns how many
    /// host/path alternatives it was attached to.
    pub(crate) fn compile<A>(
        &self,
        root: &mut TrieNode<A>,
        route: &Arc<Route<A>>,
        ast: &Ast,
    ) -> Result<usize, RouterError> {
        let path = match ast.path() {
            Some(path) => self.expand(ast, path, route, Side::Path)?,
            None => vec![Vec::new()],
        };
        let host = match ast.host() {
            Some(host) => Some(self.expand(ast, host, route, Side::Host)?),
            None => None,
        };

        let mut attached = 0;
        for path_form in path {
            let mut node = &mut *root;
            for key in path_form {
                node = insert(node, key);
            }

            match host {
                None => attached += node.attach(route) as usize,
                Some(ref host) => {
                    let host_root = node.host_trie_mut();
                    for host_form in host {
                        let mut node = &mut *host_root;
                        for key in host_form.iter().rev().cloned() {
                            node = insert(node, key);
                        }
                        attached += node.attach(route) as usize;
                    }
                }
            }
        }
        Ok(attached)
    }

    fn expand<A>(
        &self,
        ast: &Ast,
        id: NodeId,
        route: &Route<A>,
        side: Side,
    ) -> Result<Vec<Vec<Key>>, RouterError> {
        let mut forms = vec![Form::new()];
        self.expand_children(ast, id, route, &mut forms)?;

        forms
            .into_iter()
            .map(|form| {
                if form.segments.len() > self.config.max_segments {
                    return Err(RouterError::TooManySegments {
                        max: self.config.max_segments,
                    });
                }
                form.segments
                    .into_iter()
                    .map(|pieces| segment_key(pieces, side))
                    .collect()
            })
            .collect()
    }

    fn expand_children<A>(
        &self,
        ast: &Ast,
        id: NodeId,
        route: &Route<A>,
        forms: &mut Vec<Form>,
    ) -> Result<(), RouterError> {
        for &child in ast.node(id).children() {
            let node = ast.node(child);
            match node.kind() {
                AstNodeKind::SegmentDelimiter => forms.iter_mut().for_each(|f| f.open = true),
                AstNodeKind::Text => {
                    let text = node.text().unwrap_or_default();
                    for form in forms.iter_mut() {
                        form.push(Piece::Text(text.to_owned()));
                    }
                }
                AstNodeKind::Variable => {
                    let variable = self.compile_variable(ast, child, route)?;
                    for form in forms.iter_mut() {
                        form.push(Piece::Variable(variable.clone()));
                    }
                }
                AstNodeKind::OptionalRoutePart => {
                    let mut longer = forms.clone();
                    self.expand_children(ast, child, route, &mut longer)?;
                    forms.extend(longer);
                    if forms.len() > self.config.max_template_alternatives {
                        return Err(RouterError::TooManyAlternatives {
                            max: self.config.max_template_alternatives,
                        });
                    }
                }
                kind => {
                    return Err(RouterError::InvalidAst(format!(
                        "unexpected {:?} node inside a host or path",
                        kind
                    )))
                }
            }
        }
        Ok(())
    }

    fn compile_variable<A>(
        &self,
        ast: &Ast,
        id: NodeId,
        route: &Route<A>,
    ) -> Result<RouteVariable, RouterError> {
        let node = ast.node(id);
        let name = node.text().unwrap_or_default();

        let mut specs = Vec::new();
        for &child in node.children() {
            let constraint = ast.node(child);
            if constraint.kind() != AstNodeKind::VariableConstraint {
                return Err(RouterError::InvalidAst(format!(
                    "variable {:?} has a {:?} child",
                    name,
                    constraint.kind()
                )));
            }

            let mut params = Vec::new();
            for &param in constraint.children() {
                match ast.node(param).parameters() {
                    Some(p) if ast.node(param).kind() == AstNodeKind::VariableConstraintParameters => {
                        params.extend_from_slice(p)
                    }
                    _ => {
                        return Err(RouterError::InvalidAst(format!(
                            "constraint {:?} of variable {:?} has a non-parameter child",
                            constraint.text().unwrap_or_default(),
                            name
                        )))
                    }
                }
            }
            specs.push(RuleSpec::new(constraint.text().unwrap_or_default(), params));
        }
        specs.extend_from_slice(route.variable_rules(name));

        let rules = specs
            .iter()
            .map(|spec| self.rules.create_rule(spec.name(), spec.params()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RouteVariable::new(name, specs, rules))
    }
}

fn insert<A>(node: &mut TrieNode<A>, key: Key) -> &mut TrieNode<A> {
    match key {
        Key::Literal(text) => node.literal_child_mut(&text),
        Key::Variable(segment) => node.variable_child_mut(segment),
    }
}

fn segment_key(pieces: Vec<Piece>, side: Side) -> Result<Key, RouterError> {
    let fold = |text: String| match side {
        Side::Host => text.to_lowercase(),
        Side::Path => text,
    };

    let mut parts: Vec<SegmentPart> = Vec::with_capacity(pieces.len());
    let mut text = String::new();
    for piece in pieces {
        match piece {
            Piece::Text(t) => text.push_str(&t),
            Piece::Variable(v) => {
                if !text.is_empty() {
                    let literal = fold(std::mem::take(&mut text));
                    parts.push(SegmentPart::Literal(literal.into()));
                }
                parts.push(SegmentPart::Variable(v));
            }
        }
    }

    if parts.is_empty() {
        return Ok(Key::Literal(fold(text).into()));
    }
    if !text.is_empty() {
        parts.push(SegmentPart::Literal(fold(text).into()));
    }

    VariableSegment::new(parts).map(Key::Variable)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::router::UriTemplate;
    use crate::template::{lex, parse, AstValue};

    use http::Method;

    fn route(path: &str) -> Arc<Route<u8>> {
        Arc::new(Route::new([Method::GET], UriTemplate::new(path), 0))
    }

    #[test]
    fn constraint_with_non_parameter_child_is_rejected() {
        let mut ast = Ast::new();
        let path = ast.add_child(ast.root(), AstNodeKind::Path, AstValue::None);
        ast.add_child(path, AstNodeKind::SegmentDelimiter, AstValue::Text("/".into()));
        let variable = ast.add_child(path, AstNodeKind::Variable, AstValue::Text("id".into()));
        let constraint = ast.add_child(
            variable,
            AstNodeKind::VariableConstraint,
            AstValue::Text("int".into()),
        );
        ast.add_child(constraint, AstNodeKind::Text, AstValue::Text("x".into()));

        let rules = RuleFactory::default();
        let config = RouterConfig::default();
        let mut root = TrieNode::root();
        let err = TrieCompiler::new(&rules, &config)
            .compile(&mut root, &route("/:id"), &ast)
            .unwrap_err();
        assert!(matches!(err, RouterError::InvalidAst(_)), "{:?}", err);
        assert_eq!(root.node_count(), 1);
    }

    #[test]
    fn segment_limit_applies_to_every_form() {
        let rules = RuleFactory::default();
        let config = RouterConfig::default().with_max_segments(2);
        let compiler = TrieCompiler::new(&rules, &config);
        let mut root = TrieNode::root();

        let ast = parse(lex("/a/b").unwrap()).unwrap();
        assert_eq!(compiler.compile(&mut root, &route("/a/b"), &ast).unwrap(), 1);

        let ast = parse(lex("/a/b[/c]").unwrap()).unwrap();
        let before = root.node_count();
        match compiler.compile(&mut root, &route("/a/b[/c]"), &ast) {
            Err(RouterError::TooManySegments { max }) => assert_eq!(max, 2),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(root.node_count(), before);
    }
}
