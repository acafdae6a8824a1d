use airroute::cli::{run_cli, Cli};
use airroute::logging::{init_logging, LogConfig};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_env())?;
    let stdout = std::io::stdout();
    run_cli(cli, &mut stdout.lock())
}
