//! Router core module - hot path for request routing.
//!
//! # Allocation Discipline
//!
//! [`Router::route`] is on the request hot path. The backtracking stack lives
//! inline, parameter spans and values live in pooled buffers, and handlers are
//! returned by reference. The following clippy lints are denied here to catch
//! accidental allocation:
//!
//! - `clippy::inefficient_to_string` - Catches unnecessary allocations
//! - `clippy::format_push_string` - Prevents format! string building
//! - `clippy::unnecessary_to_owned` - Prevents .to_owned() on borrowed data

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::error::RouteError;
use super::params::{ParamBuf, ParamPool, Params};
use super::radix::{Endpoint, Lookup, NodeKind, RadixTree};
use super::validate::{self, ParsedPath};
use crate::runtime_config::RouterConfig;

/// What a lookup resolved to.
///
/// Not-found and method-not-allowed are ordinary outcomes; the hosting
/// framework answers them like any other route (typically 404 / 405).
pub enum Resolution<'r, H> {
    /// A handler registered for the method and path
    Matched(&'r H),
    /// The path exists but not for this method
    MethodNotAllowed {
        /// Comma-separated methods the path does serve, for the `Allow` header
        allow: &'r str,
    },
    /// No route matches the path
    NotFound,
}

impl<H> Clone for Resolution<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Resolution<'_, H> {}

impl<H: fmt::Debug> fmt::Debug for Resolution<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Matched(handler) => f.debug_tuple("Matched").field(handler).finish(),
            Resolution::MethodNotAllowed { allow } => f
                .debug_struct("MethodNotAllowed")
                .field("allow", allow)
                .finish(),
            Resolution::NotFound => f.write_str("NotFound"),
        }
    }
}

/// Result of routing one request
///
/// Borrows the handler and parameter names from the router and owns a pooled
/// parameter buffer. Dropping the match returns the buffer to the pool, so
/// hold it for as long as the handler needs [`RouteMatch::params`]; use
/// [`Params::to_vec`] to keep bindings beyond that.
pub struct RouteMatch<'r, H> {
    resolution: Resolution<'r, H>,
    names: &'r [Arc<str>],
    pattern: Option<&'r str>,
    buf: Option<ParamBuf>,
    pool: &'r ParamPool,
}

impl<'r, H> RouteMatch<'r, H> {
    #[inline]
    #[must_use]
    pub fn resolution(&self) -> Resolution<'r, H> {
        self.resolution
    }

    /// The matched handler, `None` for not-found and method-not-allowed
    #[inline]
    #[must_use]
    pub fn handler(&self) -> Option<&'r H> {
        match self.resolution {
            Resolution::Matched(handler) => Some(handler),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self.resolution, Resolution::Matched(_))
    }

    /// Route path as registered (e.g. `/users/:id`), also set for method-not-allowed
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> Option<&'r str> {
        self.pattern
    }

    /// Path parameters bound by the match; empty unless [`Resolution::Matched`]
    #[inline]
    #[must_use]
    pub fn params(&self) -> Params<'_> {
        match &self.buf {
            Some(buf) if self.is_match() => Params::new(self.names, buf.values()),
            _ => Params::empty(),
        }
    }
}

impl<H> Drop for RouteMatch<'_, H> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}

impl<H: fmt::Debug> fmt::Debug for RouteMatch<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("resolution", &self.resolution)
            .field("pattern", &self.pattern)
            .field("params", &self.params())
            .finish()
    }
}

/// Router that matches HTTP requests to handlers using a radix tree
///
/// Routes are registered once at startup with [`Router::register`]; lookups
/// with [`Router::route`] take `&self` and may run from any number of threads
/// at once. Registration needs `&mut self`, so it cannot overlap lookups.
///
/// # Path Syntax
///
/// - `/users/new` - literal path
/// - `/users/:id` - `id` binds one segment (up to the next `/`)
/// - `/files/*` - `*` binds the rest of the path, including `/`
///
/// At every position literal routes win over parameters, which win over a
/// wildcard.
///
/// # Example
///
/// ```rust
/// use airroute::{Resolution, Router};
/// use http::Method;
///
/// let mut router = Router::new();
/// router.register(Method::GET, "/users/:id", "get_user");
/// router.register(Method::GET, "/users/new", "new_user_form");
///
/// let m = router.route(&Method::GET, "/users/42");
/// assert!(matches!(m.resolution(), Resolution::Matched(&"get_user")));
/// assert_eq!(m.params().get("id"), Some("42"));
/// ```
pub struct Router<H> {
    tree: RadixTree<H>,
    /// `(method, structural path)` pairs already registered
    identities: HashSet<(Method, String)>,
    /// Structural path -> path as first registered, for ambiguity checks
    shapes: HashMap<String, Arc<str>>,
    routes: Vec<(Method, Arc<str>)>,
    max_params: usize,
    pool: ParamPool,
    config: RouterConfig,
}

impl<H> Router<H> {
    /// Create an empty router with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Create an empty router with explicit configuration
    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            tree: RadixTree::new(),
            identities: HashSet::new(),
            shapes: HashMap::new(),
            routes: Vec::new(),
            max_params: 0,
            pool: ParamPool::new(config.pool_capacity),
            config,
        }
    }

    /// Register a route, panicking if it is malformed or conflicts.
    ///
    /// Route tables are built at startup, so a bad route is a programming
    /// error; use [`Router::try_register`] to handle the error instead.
    ///
    /// # Panics
    ///
    /// Panics with the [`RouteError`] message on any registration error.
    #[allow(clippy::panic)]
    pub fn register(&mut self, method: Method, path: &str, handler: H) {
        if let Err(err) = self.try_register(method, path, handler) {
            error!(error = %err, "Route registration failed");
            panic!("{}", err);
        }
    }

    /// Register a route.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] if the path is malformed, the method and path
    /// shape are already registered, or the shape is registered with different
    /// parameter names.
    pub fn try_register(&mut self, method: Method, path: &str, handler: H) -> Result<(), RouteError> {
        let parsed = validate::parse(path)?;
        self.check_conflicts(&method, path, &parsed)?;

        let pattern: Arc<str> = Arc::from(path);
        let param_count = parsed.names.len();
        let endpoint = Endpoint {
            method: method.clone(),
            handler: Arc::new(handler),
            param_names: Arc::from(parsed.names.clone()),
            pattern: Arc::clone(&pattern),
        };
        self.insert_parsed(&parsed, endpoint);

        self.identities
            .insert((method.clone(), parsed.structural.clone()));
        self.shapes
            .entry(parsed.structural)
            .or_insert_with(|| Arc::clone(&pattern));
        self.max_params = self.max_params.max(param_count);
        self.routes.push((method.clone(), pattern));

        debug!(
            method = %method,
            path = %path,
            params = param_count,
            routes_count = self.routes.len(),
            "Route registered"
        );
        Ok(())
    }

    fn check_conflicts(&self, method: &Method, path: &str, parsed: &ParsedPath) -> Result<(), RouteError> {
        if self
            .identities
            .contains(&(method.clone(), parsed.structural.clone()))
        {
            return Err(RouteError::DuplicateRoute {
                method: method.clone(),
                path: path.to_owned(),
            });
        }
        if let Some(existing) = self.shapes.get(&parsed.structural) {
            if existing.as_ref() != path {
                return Err(RouteError::AmbiguousRoute {
                    path: path.to_owned(),
                    existing: existing.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Insert a static node boundary before every marker, then the marker
    /// itself; the route's endpoint goes on the last node.
    fn insert_parsed(&mut self, parsed: &ParsedPath, endpoint: Endpoint<H>) {
        let path = parsed.structural.as_str();
        let mut endpoint = Some(endpoint);

        for &at in &parsed.markers {
            self.tree.insert(&path[..at], NodeKind::Static, None);
            let end = at + 1;
            let kind = if path.as_bytes()[at] == b'*' {
                NodeKind::Wildcard
            } else {
                NodeKind::Param
            };
            let terminal = if end == path.len() { endpoint.take() } else { None };
            self.tree.insert(&path[..end], kind, terminal);
        }

        if endpoint.is_some() {
            self.tree.insert(path, NodeKind::Static, endpoint.take());
        }
    }

    /// Match a request to a route.
    ///
    /// Always returns; unmatched requests resolve to [`Resolution::NotFound`]
    /// or [`Resolution::MethodNotAllowed`].
    ///
    /// With [`RouterConfig::trailing_slash`] set, a path ending in `/` is
    /// retried without it when nothing matches, or when only a wildcard
    /// matched by capturing the slash.
    ///
    /// # Example
    ///
    /// ```rust
    /// use airroute::{Resolution, Router};
    /// use http::Method;
    ///
    /// let mut router = Router::new();
    /// router.register(Method::GET, "/files/*", "serve");
    ///
    /// let m = router.route(&Method::POST, "/files/a.txt");
    /// assert!(matches!(m.resolution(), Resolution::MethodNotAllowed { allow: "GET" }));
    /// ```
    pub fn route(&self, method: &Method, path: &str) -> RouteMatch<'_, H> {
        debug!(method = %method, path = %path, "Route match attempt");
        let match_start = Instant::now();

        let mut buf = self.pool.acquire(self.max_params);
        let mut searched = path;
        let mut lookup = self.tree.search(method, searched, buf.spans_mut());

        if self.config.trailing_slash && path.len() > 1 {
            if let Some(trimmed) = path.strip_suffix('/') {
                match lookup {
                    Lookup::NotFound => {
                        searched = trimmed;
                        lookup = self.tree.search(method, searched, buf.spans_mut());
                    }
                    // a wildcard that only won by capturing the slash yields
                    // to a non-wildcard route for the trimmed path
                    Lookup::Found(node, _) if node.is_wildcard() => {
                        let fallback = self.tree.search(method, trimmed, buf.spans_mut());
                        if matches!(fallback, Lookup::Found(node, _) if !node.is_wildcard()) {
                            searched = trimmed;
                            lookup = fallback;
                        } else {
                            // restore the wildcard's capture spans
                            lookup = self.tree.search(method, path, buf.spans_mut());
                        }
                    }
                    _ => {}
                }
            }
        }

        let (resolution, names, pattern) = match lookup {
            Lookup::Found(node, handler) => {
                buf.fill(searched);
                (Resolution::Matched(handler), node.param_names(), node.pattern())
            }
            Lookup::MethodNotAllowed(node) => (
                Resolution::MethodNotAllowed { allow: node.allow() },
                &[][..],
                node.pattern(),
            ),
            Lookup::NotFound => (Resolution::NotFound, &[][..], None),
        };

        let match_duration = match_start.elapsed();
        if match_duration > self.config.slow_match_threshold() {
            warn!(
                method = %method,
                path = %path,
                route_pattern = pattern.unwrap_or("<none>"),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        }
        match resolution {
            Resolution::Matched(_) => debug!(
                method = %method,
                path = %path,
                route_pattern = pattern.unwrap_or_default(),
                params = buf.values().len(),
                duration_us = match_duration.as_micros(),
                "Route matched"
            ),
            Resolution::MethodNotAllowed { allow } => debug!(
                method = %method,
                path = %path,
                allow = allow,
                "Method not allowed"
            ),
            Resolution::NotFound => debug!(method = %method, path = %path, "No route matched"),
        }

        RouteMatch {
            resolution,
            names,
            pattern,
            buf: Some(buf),
            pool: &self.pool,
        }
    }

    /// Registered routes as `(method, path)`, in registration order
    pub fn routes(&self) -> impl Iterator<Item = (&Method, &str)> {
        self.routes.iter().map(|(m, p)| (m, p.as_ref()))
    }

    /// Number of registered routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Largest parameter count over all registered routes
    #[must_use]
    pub fn max_params(&self) -> usize {
        self.max_params
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Idle buffers currently held by the parameter pool
    #[must_use]
    pub fn pooled_buffers(&self) -> usize {
        self.pool.idle()
    }

    /// Log a summary of the routing table
    pub fn log_summary(&self) {
        let routes_summary: Vec<String> = self
            .routes
            .iter()
            .take(10)
            .map(|(method, path)| format!("{} {}", method, path))
            .collect();
        info!(
            routes_count = self.routes.len(),
            nodes = self.tree.node_count(),
            max_params = self.max_params,
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );
    }

    /// Render the radix tree, one node per line, for debugging
    #[must_use]
    pub fn tree_string(&self) -> String {
        self.tree.to_string()
    }
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones share handlers but get a fresh, empty parameter pool.
impl<H> Clone for Router<H> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            identities: self.identities.clone(),
            shapes: self.shapes.clone(),
            routes: self.routes.clone(),
            max_params: self.max_params,
            pool: ParamPool::new(self.config.pool_capacity),
            config: self.config,
        }
    }
}

impl<H> fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("max_params", &self.max_params)
            .field("pool", &self.pool)
            .field("config", &self.config)
            .finish()
    }
}
