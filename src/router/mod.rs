mod captures;
mod core;
mod error;
mod imp;
mod match_result;
mod matcher;
mod route;
mod uri;

pub use self::captures::RouteVariables;
pub use self::error::RouterError;
pub use self::match_result::MatchResult;
pub use self::route::{
    ConstraintContext, MiddlewareBinding, Route, RouteConstraint, UriTemplate,
};

use crate::config::RouterConfig;
use crate::rules::RuleFactory;
use crate::trie::TrieNode;

use std::collections::HashMap;
use std::sync::Arc;

/// Routes compiled into one trie.
///
/// Registration mutates the trie; after that the router is only read, so a
/// built router can be shared behind an `Arc` by any number of threads.
#[derive(Debug)]
pub struct Router<A> {
    root: TrieNode<A>,
    routes: Vec<Arc<Route<A>>>,
    names: HashMap<Box<str>, usize>,
    rules: Arc<RuleFactory>,
    config: RouterConfig,
}
