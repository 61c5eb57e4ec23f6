use super::error::RouterError;
use super::route::Route;
use super::Router;

use crate::template::{lex, parse};
use crate::trie::TrieCompiler;

use std::sync::Arc;

use tracing::debug;

impl<A> Router<A> {
    /// Compiles `route` into the trie.
    ///
    /// Template failures are reported with the offending template. A failed
    /// registration leaves the trie as it was.
    pub fn register_route(&mut self, route: Route<A>) -> Result<Arc<Route<A>>, RouterError> {
        if let Some(name) = route.name() {
            if self.names.contains_key(name) {
                return Err(RouterError::DuplicateRouteName(name.to_owned()));
            }
        }

        let source = route.template().source();
        let route = Arc::new(route);
        let attached = self
            .compile_route(&route, &source)
            .map_err(|e| e.in_template(&source))?;

        debug!(
            template = %source,
            methods = ?route.methods(),
            alternatives = attached,
            "compiled route"
        );

        if let Some(name) = route.name() {
            self.names.insert(name.into(), self.routes.len());
        }
        self.routes.push(Arc::clone(&route));
        Ok(route)
    }

    fn compile_route(&mut self, route: &Arc<Route<A>>, source: &str) -> Result<usize, RouterError> {
        let ast = parse(lex(source)?)?;
        let compiler = TrieCompiler::new(&self.rules, &self.config);
        compiler.compile(&mut self.root, route, &ast)
    }
}
