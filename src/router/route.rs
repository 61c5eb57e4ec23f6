use crate::rules::{RuleParam, RuleSpec};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::{HeaderMap, Method};
use smallvec::SmallVec;

/// The host and path templates of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    path: Box<str>,
    host: Option<Box<str>>,
    https_only: bool,
}

impl UriTemplate {
    /// The path always gets a leading `/`.
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize_path(path),
            host: None,
            https_only: false,
        }
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.set_host(Some(host));
        self
    }

    pub fn with_https_only(mut self, https_only: bool) -> Self {
        self.https_only = https_only;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn is_https_only(&self) -> bool {
        self.https_only
    }

    /// Host and path joined, the form the lexer reads.
    pub fn source(&self) -> String {
        match self.host {
            Some(ref host) => format!("{}{}", host, self.path),
            None => self.path.to_string(),
        }
    }

    pub(crate) fn set_host(&mut self, host: Option<&str>) {
        self.host = host
            .map(|h| h.trim_matches(|c| c == '/' || c == '.'))
            .filter(|h| !h.is_empty())
            .map(Into::into);
    }

    pub(crate) fn set_https_only(&mut self, https_only: bool) {
        self.https_only = https_only;
    }

    pub(crate) fn prefix_path(&mut self, prefix: &str) {
        let prefix = prefix.trim_matches('/');
        if !prefix.is_empty() {
            self.path = format!("/{}{}", prefix, self.path).into();
        }
    }

    /// `api` under a group host `example.com` becomes `api.example.com`.
    pub(crate) fn append_host(&mut self, suffix: &str) {
        let suffix = suffix.trim_start_matches('.');
        let joined = match self.host {
            // `[www.]` already ends in a delimiter
            Some(ref host) if host.ends_with(".]") => format!("{}{}", host, suffix),
            Some(ref host) => format!("{}.{}", host, suffix),
            None => suffix.to_owned(),
        };
        self.set_host(Some(&joined));
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source())
    }
}

fn normalize_path(path: &str) -> Box<str> {
    format!("/{}", path.trim_start_matches('/')).into()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiddlewareBinding {
    name: Box<str>,
    parameters: HashMap<String, String>,
}

impl MiddlewareBinding {
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Self {
            name: name.into(),
            parameters: HashMap::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }
}

/// What a route constraint gets to look at.
#[derive(Debug)]
pub struct ConstraintContext<'a> {
    pub method: &'a Method,
    pub host: &'a str,
    pub path: &'a str,
    pub headers: &'a HeaderMap,
    pub variables: &'a [(&'a str, &'a str)],
}

/// A request-level check run after the method check. A failing constraint
/// drops the candidate and the search goes on.
pub trait RouteConstraint: fmt::Debug + Send + Sync {
    fn passes(&self, cx: &ConstraintContext<'_>) -> bool;
}

/// A registered route. Routes are shared between every trie node they are
/// attached to and never change after registration.
#[derive(Debug)]
pub struct Route<A> {
    pub(crate) methods: SmallVec<[Method; 2]>,
    pub(crate) template: UriTemplate,
    pub(crate) action: A,
    pub(crate) middleware: Vec<MiddlewareBinding>,
    pub(crate) variable_rules: HashMap<Box<str>, Vec<RuleSpec>>,
    pub(crate) constraints: Vec<Arc<dyn RouteConstraint>>,
    pub(crate) name: Option<Box<str>>,
    pub(crate) parameters: HashMap<String, String>,
}

impl<A> Route<A> {
    /// An empty method list accepts every method.
    pub fn new(methods: impl IntoIterator<Item = Method>, template: UriTemplate, action: A) -> Self {
        let mut route = Self {
            methods: SmallVec::new(),
            template,
            action,
            middleware: Vec::new(),
            variable_rules: HashMap::new(),
            constraints: Vec::new(),
            name: None,
            parameters: HashMap::new(),
        };
        route.add_methods(methods);
        route
    }

    pub fn with_name(mut self, name: impl Into<Box<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_middleware(mut self, binding: MiddlewareBinding) -> Self {
        self.middleware.push(binding);
        self
    }

    /// Adds a rule to a variable on top of those written in the template.
    pub fn with_variable_rule(mut self, variable: &str, rule: &str, params: Vec<RuleParam>) -> Self {
        self.add_variable_rule(variable, rule, params);
        self
    }

    pub fn with_constraint(mut self, constraint: impl RouteConstraint + 'static) -> Self {
        self.constraints.push(Arc::new(constraint));
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn allows_method(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }

    pub fn template(&self) -> &UriTemplate {
        &self.template
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn middleware(&self) -> &[MiddlewareBinding] {
        &self.middleware
    }

    pub fn variable_rules(&self, variable: &str) -> &[RuleSpec] {
        self.variable_rules
            .get(variable)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn constraints(&self) -> &[Arc<dyn RouteConstraint>] {
        &self.constraints
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    pub(crate) fn add_methods(&mut self, methods: impl IntoIterator<Item = Method>) {
        for method in methods {
            if !self.methods.contains(&method) {
                self.methods.push(method);
            }
        }
    }

    pub(crate) fn add_variable_rule(&mut self, variable: &str, rule: &str, params: Vec<RuleParam>) {
        self.variable_rules
            .entry(variable.into())
            .or_default()
            .push(RuleSpec::new(rule, params));
    }
}
