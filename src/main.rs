use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod mcp;

/// Log to stderr; stdout carries MCP frames or command output.
fn init_tracing(args: &cli::Cli) -> anyhow::Result<()> {
    let default = match (args.verbose, args.mcp) {
        (true, _) => "kobs=debug",
        (false, true) => "kobs=info",
        (false, false) => "kobs=warn",
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    init_tracing(&args)?;

    if args.mcp {
        mcp::serve_stdio()?;
    } else {
        cli::run(args)?;
    }

    Ok(())
}
