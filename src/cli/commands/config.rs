use crate::cli::OutputFormat;
use crate::cli::output::output;
use kobs::config::{self, types::KobsConfig};

/// Print the effective configuration after file and env overrides.
pub fn run(format: OutputFormat) -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    let rendered = render(&cfg)?;
    output(&cfg, format, &mut std::io::stdout(), |_| rendered)
}

/// The effective config as a TOML document, headed by where it came from.
fn render(cfg: &KobsConfig) -> anyhow::Result<String> {
    let source = std::env::var_os(config::CONFIG_ENV)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(config::config_path);
    let body = toml::to_string_pretty(cfg)?;
    Ok(format!("# {}\n{}", source.display(), body.trim_end()))
}
