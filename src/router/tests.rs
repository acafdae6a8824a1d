use super::{Resolution, RouteError, Router};
use crate::runtime_config::RouterConfig;
use http::Method;

fn handler_of(router: &Router<&'static str>, method: Method, path: &str) -> Option<&'static str> {
    router.route(&method, path).handler().copied()
}

#[test]
fn test_root_path() {
    let mut router = Router::new();
    router.register(Method::GET, "/", "root");
    assert_eq!(handler_of(&router, Method::GET, "/"), Some("root"));
    assert_eq!(handler_of(&router, Method::GET, "/x"), None);
}

#[test]
fn test_parameterized_path() {
    let mut router = Router::new();
    router.register(Method::GET, "/items/:id", "get_item");
    let m = router.route(&Method::GET, "/items/123");
    assert_eq!(m.handler(), Some(&"get_item"));
    assert_eq!(m.params().get("id"), Some("123"));
    assert_eq!(m.pattern(), Some("/items/:id"));
}

#[test]
fn test_nested_path() {
    let mut router = Router::new();
    router.register(Method::GET, "/a/:b/c", "nested");
    let m = router.route(&Method::GET, "/a/1/c");
    assert_eq!(m.handler(), Some(&"nested"));
    assert_eq!(m.params().get("b"), Some("1"));
    assert!(!router.route(&Method::GET, "/a/1/d").is_match());
}

#[test]
fn test_root_param_beside_static_routes() {
    let mut router = Router::new();
    router.register(Method::GET, "/:slug", "page");
    router.register(Method::GET, "/about", "about");
    assert_eq!(handler_of(&router, Method::GET, "/about"), Some("about"));
    assert_eq!(handler_of(&router, Method::GET, "/abc"), Some("page"));
    assert_eq!(handler_of(&router, Method::GET, "/"), None);
}

#[test]
fn test_backtracks_across_several_levels() {
    let mut router = Router::new();
    router.register(Method::GET, "/a/b/c/:y", "static_first");
    router.register(Method::GET, "/a/:x/c/d", "param_first");
    router.register(Method::GET, "/a/*", "catch_all");

    let m = router.route(&Method::GET, "/a/b/c/z");
    assert_eq!(m.handler(), Some(&"static_first"));
    assert_eq!(m.params().get("y"), Some("z"));

    let m = router.route(&Method::GET, "/a/q/c/d");
    assert_eq!(m.handler(), Some(&"param_first"));
    assert_eq!(m.params().get("x"), Some("q"));

    // "/a/b/c/" has a static branch, "/a/:x/c/" a param branch; neither ends in "e/f"
    let m = router.route(&Method::GET, "/a/b/c/e/f");
    assert_eq!(m.handler(), Some(&"catch_all"));
    assert_eq!(m.params().get("*"), Some("b/c/e/f"));
    assert_eq!(m.params().get("x"), None);
    assert_eq!(m.params().len(), 1);
}

#[test]
fn test_method_not_allowed_at_terminal_node() {
    let mut router = Router::new();
    router.register(Method::GET, "/users/new", "new_form");
    router.register(Method::POST, "/users/:id", "update_user");

    let m = router.route(&Method::POST, "/users/new");
    assert!(matches!(
        m.resolution(),
        Resolution::MethodNotAllowed { allow: "GET" }
    ));
    assert!(m.params().is_empty());
    drop(m);

    assert_eq!(handler_of(&router, Method::POST, "/users/7"), Some("update_user"));
}

#[test]
fn test_wildcard_method_not_allowed_does_not_fall_back() {
    let mut router = Router::new();
    router.register(Method::GET, "/files/*", "read_file");
    router.register(Method::POST, "/:dir/*", "upload");

    assert!(matches!(
        router.route(&Method::POST, "/files/a.txt").resolution(),
        Resolution::MethodNotAllowed { allow: "GET" }
    ));
    assert_eq!(handler_of(&router, Method::POST, "/docs/a.txt"), Some("upload"));
}

#[test]
fn test_method_not_allowed_reports_sorted_allow() {
    let mut router = Router::new();
    router.register(Method::PUT, "/pets/:id", "replace");
    router.register(Method::GET, "/pets/:id", "get");
    router.register(Method::DELETE, "/pets/:id", "delete");

    let m = router.route(&Method::PATCH, "/pets/1");
    assert!(matches!(
        m.resolution(),
        Resolution::MethodNotAllowed { allow: "DELETE, GET, PUT" }
    ));
    assert_eq!(m.pattern(), Some("/pets/:id"));
    assert!(m.params().is_empty());
}

#[test]
fn test_same_shape_on_other_method_shares_names() {
    let mut router = Router::new();
    router.register(Method::GET, "/pets/:id", "get");
    let err = router
        .try_register(Method::POST, "/pets/:pet_id", "post")
        .unwrap_err();
    assert_eq!(
        err,
        RouteError::AmbiguousRoute {
            path: "/pets/:pet_id".to_string(),
            existing: "/pets/:id".to_string(),
        }
    );
    router.register(Method::POST, "/pets/:id", "post");
    assert_eq!(router.len(), 2);
}

#[test]
fn test_trailing_slash_can_be_disabled() {
    let config = RouterConfig {
        trailing_slash: false,
        ..RouterConfig::default()
    };
    let mut router = Router::with_config(config);
    router.register(Method::GET, "/users/:id", "get_user");
    assert!(router.route(&Method::GET, "/users/42").is_match());
    assert!(!router.route(&Method::GET, "/users/42/").is_match());
}

#[test]
fn test_trailing_slash_prefers_param_over_wildcard_sibling() {
    let mut router = Router::new();
    router.register(Method::GET, "/users/:id", "get_user");
    router.register(Method::GET, "/users/*", "catch_all");

    for path in ["/users/42", "/users/42/"] {
        let m = router.route(&Method::GET, path);
        assert_eq!(m.handler(), Some(&"get_user"), "{}", path);
        assert_eq!(m.params().get("id"), Some("42"), "{}", path);
        assert_eq!(m.params().len(), 1);
    }

    let m = router.route(&Method::GET, "/users/a/b/");
    assert_eq!(m.handler(), Some(&"catch_all"));
    assert_eq!(m.params().get("*"), Some("a/b/"));
    drop(m);

    let m = router.route(&Method::GET, "/users/");
    assert_eq!(m.handler(), Some(&"catch_all"));
    assert_eq!(m.params().get("*"), Some(""));
}

#[test]
fn test_explicit_trailing_slash_route_wins() {
    let mut router = Router::new();
    router.register(Method::GET, "/docs", "docs");
    router.register(Method::GET, "/docs/", "docs_index");
    assert_eq!(handler_of(&router, Method::GET, "/docs/"), Some("docs_index"));
    assert_eq!(handler_of(&router, Method::GET, "/docs"), Some("docs"));
}

#[test]
fn test_match_returns_buffer_to_pool() {
    let mut router = Router::new();
    router.register(Method::GET, "/a/:x/b/:y", "two");
    router.register(Method::GET, "/c/:z", "one");
    assert_eq!(router.pooled_buffers(), 0);

    {
        let m = router.route(&Method::GET, "/a/first/b/second");
        assert_eq!(m.params().len(), 2);
        assert_eq!(router.pooled_buffers(), 0);
    }
    assert_eq!(router.pooled_buffers(), 1);

    let m = router.route(&Method::GET, "/c/third");
    assert_eq!(router.pooled_buffers(), 0);
    let collected: Vec<_> = m.params().iter().collect();
    assert_eq!(collected, vec![("z", "third")]);
    drop(m);

    let m = router.route(&Method::GET, "/nope");
    assert!(m.params().is_empty());
}

#[test]
fn test_max_params_tracks_largest_route() {
    let mut router = Router::new();
    assert_eq!(router.max_params(), 0);
    router.register(Method::GET, "/a/:x", ());
    router.register(Method::GET, "/b/:x/:y/*", ());
    router.register(Method::GET, "/c", ());
    assert_eq!(router.max_params(), 3);
    assert_eq!(router.len(), 3);
}

#[test]
fn test_routes_are_listed_in_registration_order() {
    let mut router = Router::new();
    router.register(Method::POST, "/b", ());
    router.register(Method::GET, "/a/:id", ());
    let listed: Vec<_> = router.routes().map(|(m, p)| (m.clone(), p)).collect();
    assert_eq!(listed, vec![(Method::POST, "/b"), (Method::GET, "/a/:id")]);
}

#[test]
fn test_tree_string_shows_shared_prefixes() {
    let mut router = Router::new();
    router.register(Method::GET, "/users", ());
    router.register(Method::GET, "/users/:id", ());
    router.register(Method::POST, "/uploads", ());
    let rendered = router.tree_string();
    assert_eq!(
        rendered,
        "/u\n  sers [GET]\n    /\n      : [GET]\n  ploads [POST]\n"
    );
}

#[test]
#[should_panic(expected = "already registered")]
fn test_register_panics_on_duplicate() {
    let mut router = Router::new();
    router.register(Method::GET, "/dup", ());
    router.register(Method::GET, "/dup", ());
}

#[test]
#[should_panic(expected = "not at the end")]
fn test_register_panics_on_bad_wildcard() {
    let mut router = Router::new();
    router.register(Method::GET, "/foo*bar", ());
}

#[test]
fn test_clone_has_independent_pool() {
    let mut router = Router::new();
    router.register(Method::GET, "/x/:id", 1u8);
    drop(router.route(&Method::GET, "/x/1"));
    assert_eq!(router.pooled_buffers(), 1);

    let copy = router.clone();
    assert_eq!(copy.pooled_buffers(), 0);
    assert_eq!(copy.route(&Method::GET, "/x/2").handler(), Some(&1));
}
