//! # Router Module
//!
//! Path matching and route resolution. Routes are compiled into a radix tree
//! at registration time; each request is resolved by walking the tree once,
//! backtracking only when a more specific branch dead-ends.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Validating route paths and rejecting duplicate or ambiguous routes
//! - Matching incoming requests to registered handlers
//! - Extracting and percent-decoding path parameters
//! - Reporting not-found and method-not-allowed outcomes
//!
//! ## Architecture
//!
//! 1. **Registration**: a path such as `/users/:id/posts/*` is validated, its
//!    parameter names are erased (`/users/:/posts/*`), and each static,
//!    parameter and wildcard boundary is inserted into the tree.
//!
//! 2. **Matching**: the request path is walked from the root, preferring
//!    static children over parameter children over the wildcard child. Captured
//!    values are written to a pooled buffer that returns to the pool when the
//!    [`RouteMatch`] is dropped.
//!
//! ## Example
//!
//! ```rust
//! use airroute::router::{Resolution, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.register(Method::GET, "/users/:id", "get_user");
//! router.register(Method::GET, "/users/:id/posts/:post_id", "get_post");
//!
//! let m = router.route(&Method::GET, "/users/7/posts/99");
//! assert_eq!(m.handler(), Some(&"get_post"));
//! assert_eq!(m.params().get("post_id"), Some("99"));
//!
//! let m = router.route(&Method::DELETE, "/users/7");
//! assert!(matches!(m.resolution(), Resolution::MethodNotAllowed { .. }));
//! ```
//!
//! ## Performance
//!
//! - Lookup is O(k) in the path length, independent of the route count
//! - No heap allocation per lookup once the parameter pool is warm
//! - `Router::route` takes `&self`; any number of threads can route at once

mod core;
mod decode;
mod error;
mod params;
mod radix;
mod shared;
mod validate;
#[cfg(test)]
mod tests;

pub use core::{Resolution, RouteMatch, Router};
pub use error::RouteError;
pub use params::Params;
pub use radix::MAX_INLINE_DEPTH;
pub use shared::SharedRouter;
pub use validate::WILDCARD_PARAM;
