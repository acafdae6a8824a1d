use airroute::{Router, RouterConfig, SharedRouter};
use http::Method;
use std::thread;

const THREADS: usize = 8;
const ROUNDS: usize = 200;

fn build_router(config: RouterConfig) -> Router<&'static str> {
    let mut router = Router::with_config(config);
    router.register(Method::GET, "/", "root");
    router.register(Method::GET, "/users", "list_users");
    router.register(Method::GET, "/users/new", "new_user");
    router.register(Method::GET, "/users/:id", "get_user");
    router.register(Method::DELETE, "/users/:id", "delete_user");
    router.register(Method::GET, "/users/:id/posts/:post", "get_post");
    router.register(Method::GET, "/static/*", "static");
    router
}

fn requests() -> Vec<(Method, String)> {
    let mut out = Vec::new();
    for i in 0..16 {
        out.push((Method::GET, format!("/users/{}", i)));
        out.push((Method::GET, format!("/users/{}/posts/p{}", i, i * 3)));
        out.push((Method::DELETE, format!("/users/{}/", i)));
        out.push((Method::GET, format!("/static/{}/app.js", i)));
        out.push((Method::POST, format!("/users/{}", i)));
        out.push((Method::GET, format!("/missing/{}", i)));
    }
    out.push((Method::GET, "/users/new".to_string()));
    out.push((Method::GET, "/".to_string()));
    out
}

/// Handler, decoded params, and whether the method was rejected.
type Outcome = (Option<&'static str>, Vec<(String, String)>, bool);

fn resolve(router: &Router<&'static str>, method: &Method, path: &str) -> Outcome {
    let m = router.route(method, path);
    let rejected = matches!(
        m.resolution(),
        airroute::Resolution::MethodNotAllowed { .. }
    );
    (m.handler().copied(), m.params().to_vec(), rejected)
}

#[test]
fn test_parallel_lookups_match_sequential() {
    let router = build_router(RouterConfig::default());
    let requests = requests();
    let expected: Vec<Outcome> = requests
        .iter()
        .map(|(method, path)| resolve(&router, method, path))
        .collect();

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..ROUNDS {
                    for ((method, path), want) in requests.iter().zip(&expected) {
                        assert_eq!(&resolve(&router, method, path), want, "{} {}", method, path);
                    }
                }
            });
        }
    });
}

#[test]
fn test_pool_is_bounded_under_contention() {
    let config = RouterConfig {
        pool_capacity: 2,
        ..RouterConfig::default()
    };
    let router = build_router(config);

    thread::scope(|s| {
        for t in 0..THREADS {
            let router = &router;
            s.spawn(move || {
                for i in 0..ROUNDS {
                    let path = format!("/users/{}/posts/{}", t, i);
                    let m = router.route(&Method::GET, &path);
                    assert_eq!(m.params().get("id"), Some(t.to_string().as_str()));
                    assert_eq!(m.params().get("post"), Some(i.to_string().as_str()));
                }
            });
        }
    });

    assert!(router.pooled_buffers() <= 2);
}

#[test]
fn test_shared_router_serves_while_registering() {
    let shared: SharedRouter<&'static str> = SharedRouter::new();
    shared
        .register(Method::GET, "/users/:id", "get_user")
        .unwrap();

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..ROUNDS {
                    let handler = shared.with_route(&Method::GET, "/users/9", |m| m.handler().copied());
                    assert_eq!(handler, Some("get_user"));
                }
            });
        }
        s.spawn(|| {
            for i in 0..32 {
                let path = format!("/extra{}/:id", i);
                shared.register(Method::GET, &path, "extra").unwrap();
            }
        });
    });

    let router = shared.load();
    assert_eq!(router.len(), 33);
    assert_eq!(
        router.route(&Method::GET, "/extra31/x").handler().copied(),
        Some("extra")
    );
}
