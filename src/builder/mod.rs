mod routes_macro;

use crate::config::RouterConfig;
use crate::router::{MiddlewareBinding, Route, RouteConstraint, Router, RouterError, UriTemplate};
use crate::rules::{RuleFactory, RuleParam};

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;

/// Registration side of a route, handed out by [`RouteCollectionBuilder`].
#[derive(Debug)]
pub struct RouteBuilder<A> {
    route: Route<A>,
}

impl<A> RouteBuilder<A> {
    /// Binds the route to a host template such as `[api.]example.com`.
    pub fn host(&mut self, host: &str) -> &mut Self {
        self.route.template.set_host(Some(host));
        self
    }

    pub fn https_only(&mut self) -> &mut Self {
        self.route.template.set_https_only(true);
        self
    }

    pub fn named(&mut self, name: &str) -> &mut Self {
        self.route.name = Some(name.into());
        self
    }

    pub fn middleware(&mut self, binding: MiddlewareBinding) -> &mut Self {
        self.route.middleware.push(binding);
        self
    }

    /// Adds a rule to a variable after the rules written in the template.
    pub fn where_variable(&mut self, variable: &str, rule: &str, params: Vec<RuleParam>) -> &mut Self {
        self.route.add_variable_rule(variable, rule, params);
        self
    }

    pub fn constraint(&mut self, constraint: impl RouteConstraint + 'static) -> &mut Self {
        self.route.constraints.push(Arc::new(constraint));
        self
    }

    pub fn attribute(&mut self, key: &str, value: &str) -> &mut Self {
        self.route.parameters.insert(key.to_owned(), value.to_owned());
        self
    }
}

/// Settings shared by every route registered inside a group.
#[derive(Debug, Clone, Default)]
pub struct GroupOptions {
    prefix: Option<String>,
    host: Option<String>,
    https_only: bool,
    middleware: Vec<MiddlewareBinding>,
    constraints: Vec<Arc<dyn RouteConstraint>>,
    attributes: HashMap<String, String>,
}

impl GroupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_owned());
        self
    }

    /// Host appended to the route's own host: `api` in a group on
    /// `example.com` becomes `api.example.com`.
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_owned());
        self
    }

    pub fn https_only(mut self) -> Self {
        self.https_only = true;
        self
    }

    pub fn middleware(mut self, binding: MiddlewareBinding) -> Self {
        self.middleware.push(binding);
        self
    }

    pub fn constraint(mut self, constraint: impl RouteConstraint + 'static) -> Self {
        self.constraints.push(Arc::new(constraint));
        self
    }

    pub fn attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_owned(), value.to_owned());
        self
    }

    fn apply<A>(&self, route: &mut Route<A>) {
        if let Some(ref prefix) = self.prefix {
            route.template.prefix_path(prefix);
        }
        if let Some(ref host) = self.host {
            route.template.append_host(host);
        }
        if self.https_only {
            route.template.set_https_only(true);
        }
        let mut middleware = self.middleware.clone();
        middleware.append(&mut route.middleware);
        route.middleware = middleware;

        let mut constraints = self.constraints.clone();
        constraints.append(&mut route.constraints);
        route.constraints = constraints;

        for (key, value) in &self.attributes {
            route
                .parameters
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

/// Collects route definitions before they are compiled into a [`Router`].
#[derive(Debug)]
pub struct RouteCollectionBuilder<A> {
    routes: Vec<RouteBuilder<A>>,
}

impl<A> Default for RouteCollectionBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> RouteCollectionBuilder<A> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// An empty `methods` list accepts every method.
    pub fn route(
        &mut self,
        methods: impl IntoIterator<Item = Method>,
        path: &str,
        action: A,
    ) -> &mut RouteBuilder<A> {
        let route = Route::new(methods, UriTemplate::new(path), action);
        self.routes.push(RouteBuilder { route });
        let last = self.routes.len() - 1;
        &mut self.routes[last]
    }

    pub fn get(&mut self, path: &str, action: A) -> &mut RouteBuilder<A> {
        self.route([Method::GET], path, action)
    }

    pub fn post(&mut self, path: &str, action: A) -> &mut RouteBuilder<A> {
        self.route([Method::POST], path, action)
    }

    pub fn put(&mut self, path: &str, action: A) -> &mut RouteBuilder<A> {
        self.route([Method::PUT], path, action)
    }

    pub fn patch(&mut self, path: &str, action: A) -> &mut RouteBuilder<A> {
        self.route([Method::PATCH], path, action)
    }

    pub fn delete(&mut self, path: &str, action: A) -> &mut RouteBuilder<A> {
        self.route([Method::DELETE], path, action)
    }

    pub fn head(&mut self, path: &str, action: A) -> &mut RouteBuilder<A> {
        self.route([Method::HEAD], path, action)
    }

    pub fn options(&mut self, path: &str, action: A) -> &mut RouteBuilder<A> {
        self.route([Method::OPTIONS], path, action)
    }

    pub fn any(&mut self, path: &str, action: A) -> &mut RouteBuilder<A> {
        self.route([], path, action)
    }

    /// Registers the routes added by `f` with `options` applied. Groups nest;
    /// outer prefixes, middleware and constraints come first.
    pub fn group(&mut self, options: GroupOptions, f: impl FnOnce(&mut Self)) -> &mut Self {
        let start = self.routes.len();
        f(self);
        for builder in &mut self.routes[start..] {
            options.apply(&mut builder.route);
        }
        self
    }

    /// Moves every route of `other` under `prefix`.
    pub fn nest(&mut self, prefix: &str, other: RouteCollectionBuilder<A>) -> &mut Self {
        for mut builder in other.routes {
            builder.route.template.prefix_path(prefix);
            self.routes.push(builder);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn into_routes(self) -> Vec<Route<A>> {
        self.routes.into_iter().map(|b| b.route).collect()
    }

    pub fn build(self) -> Result<Router<A>, RouterError> {
        self.build_with(Arc::new(RuleFactory::default()), RouterConfig::default())
    }

    pub fn build_with(self, rules: Arc<RuleFactory>, config: RouterConfig) -> Result<Router<A>, RouterError> {
        let mut router = Router::with_rules(rules, config);
        for route in self.into_routes() {
            router.register_route(route)?;
        }
        Ok(router)
    }
}
