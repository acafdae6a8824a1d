//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the router.
//!
//! ## Environment Variables
//!
//! ### `AIRROUTE_POOL_CAPACITY`
//!
//! Maximum number of idle parameter buffers kept for reuse. Size it to the
//! number of requests routed concurrently; buffers released beyond this are
//! dropped. Accepts decimal (`1024`) or hexadecimal (`0x400`).
//!
//! Default: `1024`
//!
//! ### `AIRROUTE_SLOW_MATCH_US`
//!
//! Lookups slower than this many microseconds are logged at `WARN`.
//!
//! Default: `1000` (1 ms)
//!
//! ### `AIRROUTE_TRAILING_SLASH`
//!
//! When enabled, `/users/42/` falls back to `/users/42` if nothing matches
//! the path with its trailing slash. Accepts `true`/`false`, `1`/`0`,
//! `on`/`off`, `yes`/`no`.
//!
//! Default: `true`
//!
//! ## Usage
//!
//! ```rust
//! use airroute::runtime_config::RouterConfig;
//!
//! let config = RouterConfig::from_env();
//! println!("Pool capacity: {}", config.pool_capacity);
//! ```
//!
//! The struct also deserializes with `serde`, so a host can embed it in its own
//! configuration file; missing fields take their defaults.

use serde::Deserialize;
use std::env;
use std::time::Duration;

const DEFAULT_POOL_CAPACITY: usize = 1024;
const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// Router tuning loaded from environment variables or a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Idle parameter buffers kept for reuse (default: 1024)
    pub pool_capacity: usize,
    /// Lookups slower than this are logged as slow (default: 1000 µs)
    pub slow_match_us: u64,
    /// Retry without a trailing `/` when nothing matches (default: true)
    pub trailing_slash: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            pool_capacity: DEFAULT_POOL_CAPACITY,
            slow_match_us: DEFAULT_SLOW_MATCH_US,
            trailing_slash: true,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let pool_capacity = lookup("AIRROUTE_POOL_CAPACITY")
            .and_then(|v| parse_size(&v))
            .unwrap_or(defaults.pool_capacity);
        let slow_match_us = lookup("AIRROUTE_SLOW_MATCH_US")
            .and_then(|v| parse_size(&v))
            .map(|v| v as u64)
            .unwrap_or(defaults.slow_match_us);
        let trailing_slash = lookup("AIRROUTE_TRAILING_SLASH")
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.trailing_slash);

        RouterConfig {
            pool_capacity,
            slow_match_us,
            trailing_slash,
        }
    }

    /// Slow-lookup threshold as a `Duration`
    pub fn slow_match_threshold(&self) -> Duration {
        Duration::from_micros(self.slow_match_us)
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
