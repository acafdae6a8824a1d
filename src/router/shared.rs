//! Shared router handle with serialized registration and lock-free reads.
//!
//! Hosts that register routes through a handle shared across threads (a
//! framework's `GET`/`POST` helpers, for instance) use [`SharedRouter`].
//! Registration runs under a mutex against a staging copy; each successful
//! registration publishes an immutable snapshot through [`ArcSwap`], and
//! request threads read the latest snapshot without taking any lock.

use arc_swap::ArcSwap;
use http::Method;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

use super::core::{RouteMatch, Router};
use super::error::RouteError;
use crate::runtime_config::RouterConfig;

/// Thread-safe router handle
///
/// # Example
///
/// ```rust
/// use airroute::SharedRouter;
/// use http::Method;
///
/// let router = SharedRouter::new();
/// router.register(Method::GET, "/pets/:id", "get_pet").unwrap();
///
/// let handler = router.with_route(&Method::GET, "/pets/7", |m| m.handler().copied());
/// assert_eq!(handler, Some("get_pet"));
/// ```
pub struct SharedRouter<H> {
    staging: Mutex<Router<H>>,
    published: ArcSwap<Router<H>>,
}

impl<H> SharedRouter<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self::from_router(Router::with_config(config))
    }

    /// Wrap a router that may already hold routes
    #[must_use]
    pub fn from_router(router: Router<H>) -> Self {
        Self {
            published: ArcSwap::from_pointee(router.clone()),
            staging: Mutex::new(router),
        }
    }

    /// Register a route and publish the updated table.
    ///
    /// Concurrent callers are serialized; readers keep seeing the previous
    /// snapshot until the new one is stored.
    ///
    /// # Errors
    ///
    /// Same as [`Router::try_register`]; on error nothing is published.
    pub fn register(&self, method: Method, path: &str, handler: H) -> Result<(), RouteError> {
        let mut staging = self.staging.lock().unwrap_or_else(PoisonError::into_inner);
        staging.try_register(method, path, handler)?;
        self.published.store(Arc::new(staging.clone()));
        Ok(())
    }

    /// Current routing table snapshot
    #[must_use]
    pub fn load(&self) -> Arc<Router<H>> {
        self.published.load_full()
    }

    /// Route against the current snapshot and hand the match to `f`.
    pub fn with_route<R, F>(&self, method: &Method, path: &str, f: F) -> R
    where
        F: FnOnce(&RouteMatch<'_, H>) -> R,
    {
        let snapshot = self.published.load();
        let matched = snapshot.route(method, path);
        f(&matched)
    }

    /// Log the published table, typically once registration is complete
    pub fn log_summary(&self) {
        let snapshot = self.published.load();
        info!(routes_count = snapshot.len(), "Publishing shared routing table");
        snapshot.log_summary();
    }
}

impl<H> Default for SharedRouter<H> {
    fn default() -> Self {
        Self::new()
    }
}
