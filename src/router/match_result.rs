use super::captures::RouteVariables;
use super::route::Route;

use std::sync::Arc;

use http::{HeaderValue, Method};

/// Outcome of matching one request.
///
/// | outcome            | `is_found` | `method_is_allowed` | `allowed_methods` |
/// |--------------------|------------|---------------------|-------------------|
/// | found              | `true`     | `Some(true)`        | empty             |
/// | method not allowed | `false`    | `Some(false)`       | union of methods  |
/// | not found          | `false`    | `None`              | empty             |
#[derive(Debug)]
pub struct MatchResult<A> {
    route: Option<Arc<Route<A>>>,
    variables: RouteVariables,
    method_is_allowed: Option<bool>,
    allowed_methods: Vec<Method>,
}

impl<A> Clone for MatchResult<A> {
    fn clone(&self) -> Self {
        Self {
            route: self.route.clone(),
            variables: self.variables.clone(),
            method_is_allowed: self.method_is_allowed,
            allowed_methods: self.allowed_methods.clone(),
        }
    }
}

impl<A> MatchResult<A> {
    pub(crate) fn found(route: Arc<Route<A>>, variables: RouteVariables) -> Self {
        Self {
            route: Some(route),
            variables,
            method_is_allowed: Some(true),
            allowed_methods: Vec::new(),
        }
    }

    pub(crate) fn method_not_allowed(allowed_methods: Vec<Method>) -> Self {
        Self {
            route: None,
            variables: RouteVariables::new(),
            method_is_allowed: Some(false),
            allowed_methods,
        }
    }

    pub(crate) fn not_found() -> Self {
        Self {
            route: None,
            variables: RouteVariables::new(),
            method_is_allowed: None,
            allowed_methods: Vec::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        self.route.is_some()
    }

    pub fn route(&self) -> Option<&Arc<Route<A>>> {
        self.route.as_ref()
    }

    pub fn variables(&self) -> &RouteVariables {
        &self.variables
    }

    /// `None` when no route matched the host and path at all.
    pub fn method_is_allowed(&self) -> Option<bool> {
        self.method_is_allowed
    }

    pub fn allowed_methods(&self) -> &[Method] {
        &self.allowed_methods
    }

    /// The `Allow` header of a 405 response, `None` unless the method was not allowed.
    pub fn allow_header(&self) -> Option<HeaderValue> {
        if self.method_is_allowed != Some(false) {
            return None;
        }
        let value = self
            .allowed_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        HeaderValue::from_str(&value).ok()
    }
}
