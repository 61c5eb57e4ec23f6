//! A URI-template router.
//!
//! Route templates such as `[api.]example.com/users/:id(int)[/:tab]` are lexed,
//! parsed into a syntax tree and compiled into a trie of literal and variable
//! nodes. Requests are matched against that trie with a backtracking search that
//! tells "no such path" apart from "path exists, but not for this method".
//!
//! ```
//! use trie_router::{Method, RouteCollectionBuilder};
//!
//! let mut routes = RouteCollectionBuilder::new();
//! routes.get("/users/:id(int)", "show_user").named("user");
//! let router = routes.build().unwrap();
//!
//! let result = router.find(&Method::GET, "example.com", "/users/42");
//! assert_eq!(result.route().map(|r| *r.action()), Some("show_user"));
//! assert_eq!(result.variables().get("id"), Some("42"));
//! ```

#![deny(unsafe_code)]

mod builder;
mod cache;
mod config;
mod router;
mod strmap;
mod trie;

pub mod rules;
pub mod template;

pub use self::builder::{GroupOptions, RouteBuilder, RouteCollectionBuilder};
pub use self::cache::{MemoryRouteCache, RouteCache, RouterLoader};
pub use self::config::RouterConfig;
pub use self::router::{
    ConstraintContext, MatchResult, MiddlewareBinding, Route, RouteConstraint, RouteVariables,
    Router, RouterError, UriTemplate,
};

pub use http::Method;
