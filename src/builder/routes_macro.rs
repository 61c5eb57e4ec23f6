/// Builds a [`RouteCollectionBuilder`](crate::RouteCollectionBuilder).
///
/// ```
/// use trie_router::{routes, Method};
///
/// let router = routes! {
///     GET "/users/:id(int)" => "show",
///     ANY "/health" => "health",
///     @ "/v1" => routes! {
///         POST "/users" => "create"
///     }
/// }
/// .build()
/// .unwrap();
///
/// assert!(router.find(&Method::POST, "", "/v1/users").is_found());
/// ```
#[macro_export]
macro_rules! routes {
    {@entry $routes:expr, @, $prefix:expr, $nested:expr} => {
        $routes.nest($prefix, $nested)
    };
    {@entry $routes:expr, ANY, $pattern:expr, $action:expr} => {
        $routes.any($pattern, $action)
    };
    {@entry $routes:expr, $method:ident, $pattern:expr, $action:expr} => {
        $routes.route([$crate::Method::$method], $pattern, $action)
    };

    {$($method:tt $pattern:expr => $action:expr),+ $(,)?} => {{
        let mut __routes = $crate::RouteCollectionBuilder::new();
        $($crate::routes!(@entry __routes, $method, $pattern, $action);)+
        __routes
    }};
}
