use trie_router::{
    routes, GroupOptions, MemoryRouteCache, Method, MiddlewareBinding, RouteCache,
    RouteCollectionBuilder, Router, RouterConfig, RouterError, RouterLoader,
};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn routes_macro() {
    let router: Router<i32> = routes! {
        GET "/u/:uid/p/:pid" => 1,
        POST "/u/:uid/p" => 2,
        @ "/v1" => routes! {
            GET "/info" => 3,
            POST "/info" => 4,
            @ "/u/:uid" => routes! {
                GET "p/:pid" => 6,
                POST "p" => 7
            }
        },
        ANY "/health" => 5,
    }
    .build()
    .unwrap();

    let find = |method: Method, path: &str| {
        router
            .find(&method, "localhost", path)
            .route()
            .map(|r| *r.action())
    };

    assert_eq!(find(Method::GET, "/u/asd/p/qwe"), Some(1));
    assert_eq!(find(Method::POST, "/u/asd/p"), Some(2));
    assert_eq!(find(Method::GET, "/v1/info"), Some(3));
    assert_eq!(find(Method::POST, "/v1/info"), Some(4));
    assert_eq!(find(Method::HEAD, "/health"), Some(5));
    assert_eq!(find(Method::GET, "/v1/u/asd/p/qwe"), Some(6));
    assert_eq!(find(Method::POST, "/v1/u/asd/p"), Some(7));
    assert_eq!(find(Method::DELETE, "/v1/info"), None);
}

#[test]
fn groups_apply_outer_settings_first() {
    let mut routes = RouteCollectionBuilder::new();
    routes.group(
        GroupOptions::new()
            .prefix("/api")
            .middleware(MiddlewareBinding::new("auth"))
            .attribute("area", "api"),
        |api| {
            api.get("/users", "users")
                .middleware(MiddlewareBinding::new("log"))
                .attribute("area", "users");
            api.group(
                GroupOptions::new()
                    .prefix("admin")
                    .middleware(MiddlewareBinding::new("admin").with_parameter("level", "2")),
                |admin| {
                    admin.get("/stats", "stats");
                },
            );
        },
    );
    routes.get("/", "home");
    let router = routes.build().unwrap();

    let users = router.find(&Method::GET, "", "/api/users");
    let users = users.route().unwrap();
    let names: Vec<&str> = users.middleware().iter().map(|m| m.name()).collect();
    assert_eq!(names, ["auth", "log"]);
    assert_eq!(users.parameter("area"), Some("users"));

    let stats = router.find(&Method::GET, "", "/api/admin/stats");
    let stats = stats.route().unwrap();
    assert_eq!(stats.template().path(), "/api/admin/stats");
    let names: Vec<&str> = stats.middleware().iter().map(|m| m.name()).collect();
    assert_eq!(names, ["auth", "admin"]);
    assert_eq!(
        stats.middleware()[1].parameters().get("level").map(String::as_str),
        Some("2")
    );
    assert_eq!(stats.parameter("area"), Some("api"));

    let home = router.find(&Method::GET, "", "/");
    assert!(home.route().unwrap().middleware().is_empty());
}

#[test]
fn groups_join_hosts() {
    let mut routes = RouteCollectionBuilder::new();
    routes.group(GroupOptions::new().host("example.com").https_only(), |site| {
        site.get("/", "root");
        site.get("/docs", "docs").host("[www.]");
        site.get("/", "api").host("api");
    });
    let router = routes.build().unwrap();

    let find = |host: &str, path: &str| {
        router
            .find(&Method::GET, host, path)
            .route()
            .map(|r| *r.action())
    };
    assert_eq!(find("example.com", "/"), Some("root"));
    assert_eq!(find("api.example.com", "/"), Some("api"));
    assert_eq!(find("www.example.com", "/docs"), Some("docs"));
    assert_eq!(find("example.com", "/docs"), Some("docs"));
    assert_eq!(find("other.com", "/"), None);

    let api = router.find(&Method::GET, "api.example.com", "/");
    let template = api.route().unwrap().template();
    assert_eq!(template.host(), Some("api.example.com"));
    assert!(template.is_https_only());
}

#[test]
fn uri_generation() {
    let mut routes = RouteCollectionBuilder::new();
    routes.get("/users/:id(int)", 1).named("user");
    routes
        .get("/archive/:year[/:month[/:day]]", 2)
        .named("archive");
    routes
        .get("/home", 3)
        .host(":tenant.example.com")
        .https_only()
        .named("tenant");
    routes.get("/status", 4).host("example.com").named("status");
    let router = routes.build().unwrap();

    assert_eq!(router.uri_for("user", &[("id", "42")]).unwrap(), "/users/42");
    assert_eq!(
        router.uri_for("archive", &[("year", "2024")]).unwrap(),
        "/archive/2024"
    );
    assert_eq!(
        router
            .uri_for("archive", &[("year", "2024"), ("month", "05")])
            .unwrap(),
        "/archive/2024/05"
    );
    assert_eq!(
        router
            .uri_for("archive", &[("year", "2024"), ("day", "17")])
            .unwrap(),
        "/archive/2024"
    );
    assert_eq!(
        router.uri_for("tenant", &[("tenant", "acme")]).unwrap(),
        "https://acme.example.com/home"
    );
    assert_eq!(
        router.uri_for("status", &[]).unwrap(),
        "http://example.com/status"
    );

    match router.uri_for("user", &[]) {
        Err(RouterError::MissingVariable { route, variable }) => {
            assert_eq!(route, "user");
            assert_eq!(variable, "id");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(
        router.uri_for("nope", &[]),
        Err(RouterError::UnknownRoute(_))
    ));
    assert!(router.route_named("user").is_some());
}

#[test]
fn uri_generation_encodes_path_values() {
    let mut routes = RouteCollectionBuilder::new();
    routes.get("/files/:name", 1).named("file");
    routes.get("/site", 2).host(":tenant.example.com").named("site");
    let router = routes.build().unwrap();

    let uri = router.uri_for("file", &[("name", "a/b?c d")]).unwrap();
    assert_eq!(uri, "/files/a%2Fb%3Fc%20d");

    let result = router.find(&Method::GET, "", &uri);
    assert_eq!(result.route().map(|r| *r.action()), Some(1));
    assert_eq!(result.variables().get("name"), Some("a%2Fb%3Fc%20d"));

    assert_eq!(
        router.uri_for("site", &[("tenant", "acme")]).unwrap(),
        "http://acme.example.com/site"
    );
}

#[test]
fn loader_builds_once() {
    let loader: RouterLoader<&'static str> = RouterLoader::new(MemoryRouteCache::new());
    let builds = AtomicUsize::new(0);

    let build = || {
        builds.fetch_add(1, Ordering::SeqCst);
        let mut routes = RouteCollectionBuilder::new();
        routes.get("/", "home");
        routes.build()
    };

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                let router = loader.load(build).unwrap();
                assert!(router.find(&Method::GET, "", "/").is_found());
            });
        }
    });
    assert_eq!(builds.load(Ordering::SeqCst), 1);

    let first = loader.load(build).unwrap();
    let second = loader.cache().get().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(builds.load(Ordering::SeqCst), 1);

    loader.cache().clear();
    loader.load(build).unwrap();
    assert_eq!(builds.load(Ordering::SeqCst), 2);
}

#[test]
fn loader_does_not_cache_failures() {
    let loader: RouterLoader<u8> = RouterLoader::new(MemoryRouteCache::new());

    let failed = loader.load(|| {
        let mut routes = RouteCollectionBuilder::new();
        routes.get("/:a:b", 1);
        routes.build()
    });
    assert!(failed.is_err());
    assert!(loader.cache().get().is_none());

    let router = loader.load(|| Ok(Router::new())).unwrap();
    assert!(router.is_empty());
}

#[cfg(feature = "serde")]
#[test]
fn config_from_toml() {
    let config: RouterConfig = toml::from_str("max_match_steps = 500").unwrap();
    assert_eq!(config.max_match_steps, 500);
    assert_eq!(
        config.max_template_alternatives,
        RouterConfig::default().max_template_alternatives
    );

    let config: RouterConfig = toml::from_str("").unwrap();
    assert_eq!(config, RouterConfig::default());
}
