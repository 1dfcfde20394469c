pub mod commands;
pub mod display;
pub mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kobs",
    about = "Kubernetes observability over MCP, backed by kubectl.",
    version
)]
pub struct Cli {
    /// Start MCP server over stdio
    #[arg(long)]
    pub mcp: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the advertised resources
    Resources,
    /// List the advertised tools
    Tools,
    /// Read a resource by URI (e.g. k8s://pods)
    Read(commands::read::ReadArgs),
    /// Call a tool with key=value arguments
    Call(commands::call::CallArgs),
    /// Check kubectl, cluster access and nodes
    Verify(commands::verify::VerifyArgs),
    /// Collect a cluster debugging report
    Debug,
    /// Show current configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Dispatch a CLI command.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Resources) => commands::list::resources(cli.format),
        Some(Commands::Tools) => commands::list::tools(cli.format),
        Some(Commands::Read(args)) => block_on(commands::read::run(args, cli.format)),
        Some(Commands::Call(args)) => block_on(commands::call::run(args, cli.format)),
        Some(Commands::Verify(args)) => block_on(commands::verify::run(args, cli.format)),
        Some(Commands::Debug) => block_on(commands::debug::run(cli.format)),
        Some(Commands::Config) => commands::config::run(cli.format),
        None => {
            // No subcommand: print help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

fn block_on<F>(fut: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = anyhow::Result<()>>,
{
    tokio::runtime::Runtime::new()?.block_on(fut)
}
