//! # CLI Module
//!
//! Command-line tooling for checking a route table before wiring it into a
//! service.
//!
//! ## Route Files
//!
//! One route per line: `METHOD PATH HANDLER`. Blank lines and lines starting
//! with `#` are ignored.
//!
//! ```text
//! # users
//! GET    /users            list_users
//! GET    /users/:id        get_user
//! DELETE /users/:id        delete_user
//! GET    /static/*         serve_static
//! ```
//!
//! ## Commands
//!
//! ### `check`
//!
//! Load a route file and resolve one or more request paths:
//!
//! ```bash
//! airroute check --routes routes.txt GET /users/42 /static/css/app.css
//! ```
//!
//! ### `dump`
//!
//! Print the registered routes, optionally with the radix tree:
//!
//! ```bash
//! airroute dump --routes routes.txt --tree
//! ```
//!
//! Registration errors (bad syntax, duplicates, ambiguous routes) are reported
//! with the offending line number.

mod commands;


pub use commands::{load_routes, parse_routes, run_cli, Cli, Commands};
