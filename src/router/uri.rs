use super::error::RouterError;
use super::Router;

use crate::template::{lex, parse, Ast, AstNodeKind, NodeId};

struct Renderer<'a> {
    ast: &'a Ast,
    route: &'a str,
    variables: &'a [(&'a str, &'a str)],
    omitted: bool,
    encode: bool,
}

impl Renderer<'_> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find_map(|&(k, v)| if k == name { Some(v) } else { None })
    }

    fn render(&mut self, id: NodeId, out: &mut String) -> Result<(), RouterError> {
        for &child in self.ast.node(id).children() {
            let node = self.ast.node(child);
            match node.kind() {
                AstNodeKind::SegmentDelimiter | AstNodeKind::Text => {
                    out.push_str(node.text().unwrap_or_default())
                }
                AstNodeKind::Variable => {
                    let name = node.text().unwrap_or_default();
                    match self.lookup(name) {
                        Some(value) if self.encode => out.push_str(&urlencoding::encode(value)),
                        Some(value) => out.push_str(value),
                        None => {
                            return Err(RouterError::MissingVariable {
                                route: self.route.to_owned(),
                                variable: name.to_owned(),
                            })
                        }
                    }
                }
                AstNodeKind::OptionalRoutePart => {
                    if self.omitted || !self.can_render(child) {
                        self.omitted = true;
                        continue;
                    }
                    self.render(child, out)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Nested optional parts are checked on their own.
    fn can_render(&self, id: NodeId) -> bool {
        self.ast.node(id).children().iter().all(|&c| {
            let node = self.ast.node(c);
            node.kind() != AstNodeKind::Variable
                || self.lookup(node.text().unwrap_or_default()).is_some()
        })
    }
}

impl<A> Router<A> {
    /// Renders the URI of a named route.
    ///
    /// Every required variable must be given. An optional part is rendered
    /// only when all of its variables are given; once one is left out, every
    /// later optional part is left out too. Routes bound to a host render as
    /// an absolute URI. Path values are percent-encoded, host values are not.
    pub fn uri_for(&self, name: &str, variables: &[(&str, &str)]) -> Result<String, RouterError> {
        let route = self
            .route_named(name)
            .ok_or_else(|| RouterError::UnknownRoute(name.to_owned()))?;
        let template = route.template();
        let ast = parse(lex(&template.source())?)?;

        let mut renderer = Renderer {
            ast: &ast,
            route: name,
            variables,
            omitted: false,
            encode: true,
        };

        let mut path = String::new();
        if let Some(id) = ast.path() {
            renderer.render(id, &mut path)?;
        }
        if path.is_empty() {
            path.push('/');
        }

        let id = match ast.host() {
            Some(id) => id,
            None => return Ok(path),
        };
        let mut host = String::new();
        renderer.omitted = false;
        renderer.encode = false;
        renderer.render(id, &mut host)?;

        let scheme = if template.is_https_only() { "https" } else { "http" };
        Ok(format!("{}://{}{}", scheme, host, path))
    }
}
