//! # airroute
//!
//! **airroute** is the routing core of an HTTP framework: it maps a request
//! method and path to a registered handler and extracts path parameters, in
//! time proportional to the path length and without per-request allocation
//! once warm.
//!
//! ## Overview
//!
//! Routes are registered at startup. Each path is validated, reduced to its
//! structural shape and inserted into a compressed prefix tree. Lookups walk
//! the tree once, preferring literal segments over `:param` segments over a
//! trailing `*`, and backtrack when a more specific branch dead-ends.
//!
//! The hosting framework owns everything around this: accepting connections,
//! parsing requests, running middleware, invoking the handler and writing the
//! response. It hands the router a method and an already-normalized path, and
//! threads the returned parameters into its own request context.
//!
//! ## Modules
//!
//! - **[`router`]** - route tree, registration, lookup, parameter pool
//! - **[`runtime_config`]** - tuning from environment variables or config files
//! - **[`logging`]** - `tracing` subscriber setup for binaries
//! - **[`cli`]** - the `airroute` route-table checker
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Server as Hosting framework
//!     participant Router as Router
//!     participant Tree as Radix tree
//!     participant Pool as Param pool
//!     participant Handler as Handler
//!
//!     Server->>Router: route(GET, "/users/42")
//!     Router->>Pool: acquire buffer
//!     Router->>Tree: search (static > param > wildcard)
//!     Tree-->>Router: node + capture spans
//!     Router->>Router: percent-decode captures
//!     Router-->>Server: RouteMatch (handler, id = "42")
//!     Server->>Handler: invoke with params
//!     Server->>Router: drop RouteMatch
//!     Router->>Pool: clear + release buffer
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use airroute::{Resolution, Router};
//! use http::Method;
//!
//! #[derive(Debug, PartialEq)]
//! enum Endpoint {
//!     ListUsers,
//!     GetUser,
//!     Assets,
//! }
//!
//! let mut router = Router::new();
//! router.register(Method::GET, "/users", Endpoint::ListUsers);
//! router.register(Method::GET, "/users/:id", Endpoint::GetUser);
//! router.register(Method::GET, "/assets/*", Endpoint::Assets);
//!
//! let m = router.route(&Method::GET, "/assets/css/site.css");
//! assert_eq!(m.handler(), Some(&Endpoint::Assets));
//! assert_eq!(m.params().get("*"), Some("css/site.css"));
//!
//! match router.route(&Method::POST, "/users").resolution() {
//!     Resolution::MethodNotAllowed { allow } => assert_eq!(allow, "GET"),
//!     other => panic!("unexpected {:?}", other),
//! };
//! ```

pub mod cli;
pub mod logging;
pub mod router;
pub mod runtime_config;

pub use router::{Params, Resolution, RouteError, RouteMatch, Router, SharedRouter};
pub use runtime_config::RouterConfig;
