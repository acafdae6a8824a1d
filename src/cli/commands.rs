use crate::router::{Resolution, Router};
use crate::runtime_config::RouterConfig;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line interface for airroute
#[derive(Parser)]
#[command(name = "airroute")]
#[command(about = "Route table checker", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve request paths against a route file
    Check {
        /// Route file with `METHOD PATH HANDLER` lines
        #[arg(short, long)]
        routes: PathBuf,

        /// HTTP method of the requests
        method: String,

        /// Request paths to resolve
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print the registered routes
    Dump {
        /// Route file with `METHOD PATH HANDLER` lines
        #[arg(short, long)]
        routes: PathBuf,

        /// Also print the radix tree
        #[arg(long, default_value_t = false)]
        tree: bool,
    },
}

fn parse_method(raw: &str) -> Result<Method> {
    Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{}'", raw))
}

/// Build a router from route-file text, naming each route by its handler.
pub fn parse_routes(source: &str, config: RouterConfig) -> Result<Router<String>> {
    let mut router = Router::with_config(config);
    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(method), Some(path), Some(handler), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(anyhow!(
                "line {}: expected 'METHOD PATH HANDLER', got '{}'",
                line_no,
                line
            ));
        };

        let method = parse_method(method).with_context(|| format!("line {}", line_no))?;
        router
            .try_register(method, path, handler.to_string())
            .with_context(|| format!("line {}", line_no))?;
    }
    Ok(router)
}

/// Read and parse a route file.
pub fn load_routes(path: &Path, config: RouterConfig) -> Result<Router<String>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read route file {}", path.display()))?;
    let router = parse_routes(&source, config)
        .with_context(|| format!("Invalid route file {}", path.display()))?;
    router.log_summary();
    Ok(router)
}

/// Run a parsed command, writing results to `out`.
pub fn run_cli(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = RouterConfig::from_env();
    match cli.command {
        Commands::Check {
            routes,
            method,
            paths,
        } => {
            let router = load_routes(&routes, config)?;
            let method = parse_method(&method)?;
            let mut unmatched = 0usize;
            for path in &paths {
                let m = router.route(&method, path);
                match m.resolution() {
                    Resolution::Matched(handler) => {
                        write!(out, "{} {} -> {}", method, path, handler)?;
                        for (name, value) in m.params().iter() {
                            write!(out, " {}={:?}", name, value)?;
                        }
                        writeln!(out)?;
                    }
                    Resolution::MethodNotAllowed { allow } => {
                        unmatched += 1;
                        writeln!(out, "{} {} -> 405 (allow: {})", method, path, allow)?;
                    }
                    Resolution::NotFound => {
                        unmatched += 1;
                        writeln!(out, "{} {} -> 404", method, path)?;
                    }
                }
            }
            info!(checked = paths.len(), unmatched, "Route check complete");
            Ok(())
        }
        Commands::Dump { routes, tree } => {
            let router = load_routes(&routes, config)?;
            for (method, path) in router.routes() {
                writeln!(out, "{:<7} {}", method.as_str(), path)?;
            }
            if tree {
                writeln!(out)?;
                write!(out, "{}", router.tree_string())?;
            }
            Ok(())
        }
    }
}
