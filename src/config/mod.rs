pub mod types;

use std::path::{Path, PathBuf};

use crate::error::{KobsError, Result};
use types::KobsConfig;

/// Explicit config file location; must exist when set.
pub const CONFIG_ENV: &str = "KOBS_CONFIG";
/// Overrides `kubectl.binary`.
pub const KUBECTL_ENV: &str = "KOBS_KUBECTL";

/// Load config from `$KOBS_CONFIG` or the XDG path, merging defaults.
pub fn load_config() -> Result<KobsConfig> {
    let mut cfg = match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_from(Path::new(&path))?,
        None => {
            let path = config_path();
            if path.is_file() {
                load_from(&path)?
            } else {
                KobsConfig::default()
            }
        }
    };

    if let Some(binary) = std::env::var_os(KUBECTL_ENV) {
        cfg.kubectl.binary = PathBuf::from(binary);
    }

    tracing::debug!(binary = %cfg.kubectl.binary.display(), "config loaded");
    Ok(cfg)
}

/// Parse a config file. Missing keys fall back to defaults.
pub fn load_from(path: &Path) -> Result<KobsConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| KobsError::Config(format!("{}: {e}", path.display())))?;
    let cfg = parse(&text).map_err(|e| KobsError::Config(format!("{}: {e}", path.display())))?;
    cfg.timeouts
        .validate()
        .map_err(|e| KobsError::Config(format!("{}: {e}", path.display())))?;
    Ok(cfg)
}

/// Parse config from TOML text.
pub fn parse(text: &str) -> std::result::Result<KobsConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Return XDG config dir (~/.config/kobs/)
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("kobs")
}

/// Return the default config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}
