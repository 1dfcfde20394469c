use std::io::Write;

use crate::cli::OutputFormat;
use kobs::config;
use kobs::core::dispatcher::Dispatcher;

#[derive(clap::Args)]
pub struct ReadArgs {
    /// Resource URI, e.g. k8s://pods
    pub uri: String,

    /// Print the kubectl command instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(args: ReadArgs, format: OutputFormat) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::from_config(&config::load_config()?);

    if args.dry_run {
        let command = dispatcher.resolve_resource(&args.uri)?;
        println!("{command}");
        return Ok(());
    }

    match dispatcher.read_resource(&args.uri).await {
        Ok(text) => {
            let mut stdout = std::io::stdout();
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                writeln!(stdout)?;
            }
            Ok(())
        }
        Err(e) => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&e.payload())?);
            }
            Err(e.into())
        }
    }
}
