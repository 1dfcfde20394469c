use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use kobs::config;
use kobs::core::dispatcher::Dispatcher;

#[derive(clap::Args)]
pub struct CallArgs {
    /// Tool name, e.g. check_pod_status
    pub tool: String,

    /// Tool argument as key=value (repeatable)
    #[arg(short = 'a', long = "arg", value_parser = parse_key_value)]
    pub args: Vec<(String, String)>,

    /// Print the kubectl command(s) instead of running them
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

pub async fn run(args: CallArgs, format: OutputFormat) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::from_config(&config::load_config()?);
    let arguments: Map<String, Value> = args
        .args
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    if args.dry_run {
        for command in dispatcher.resolve_tool(&args.tool, &arguments)?.commands() {
            println!("{command}");
        }
        return Ok(());
    }

    match dispatcher.call_tool(&args.tool, &arguments).await {
        Ok(text) => {
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "tool": args.tool,
                        "text": text,
                    }))?
                ),
                OutputFormat::Human => print!("{}", text),
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
