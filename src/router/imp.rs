use super::error::RouterError;
use super::match_result::MatchResult;
use super::route::{Route, UriTemplate};
use super::Router;

use crate::config::RouterConfig;
use crate::rules::RuleFactory;
use crate::trie::TrieNode;

use std::collections::HashMap;
use std::sync::Arc;

use http::{HeaderMap, Method};

impl<A> Default for Router<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Router<A> {
    pub fn new() -> Self {
        Self::with_rules(Arc::new(RuleFactory::default()), RouterConfig::default())
    }

    pub fn with_rules(rules: Arc<RuleFactory>, config: RouterConfig) -> Self {
        Self {
            root: TrieNode::root(),
            routes: Vec::new(),
            names: HashMap::new(),
            rules,
            config,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleFactory {
        &self.rules
    }

    /// Registers a path template for `methods`, panicking if it does not compile.
    pub fn insert(
        &mut self,
        methods: impl IntoIterator<Item = Method>,
        pattern: &str,
        action: A,
    ) -> &mut Self {
        if let Err(e) = self.try_insert(methods, pattern, action) {
            panic!("{}: pattern = {:?}", e, pattern);
        }
        self
    }

    pub fn try_insert(
        &mut self,
        methods: impl IntoIterator<Item = Method>,
        pattern: &str,
        action: A,
    ) -> Result<&mut Self, RouterError> {
        let route = Route::new(methods, UriTemplate::new(pattern), action);
        self.register_route(route)?;
        Ok(self)
    }

    pub fn find(&self, method: &Method, host: &str, path: &str) -> MatchResult<A> {
        self.find_with_headers(method, host, path, &HeaderMap::new())
    }

    pub fn route_named(&self, name: &str) -> Option<&Arc<Route<A>>> {
        self.names.get(name).map(|&i| &self.routes[i])
    }

    /// Every registered route, in registration order.
    pub fn routes(&self) -> &[Arc<Route<A>>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Nodes of the compiled trie, host tries and the root included.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}
