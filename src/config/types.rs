use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KobsConfig {
    pub kubectl: KubectlConfig,
    pub timeouts: TimeoutConfig,
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KubectlConfig {
    pub binary: PathBuf,
    /// Passed as `--context` on every invocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Passed as `--kubeconfig` on every invocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,
}

impl Default for KubectlConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("kubectl"),
            context: None,
            kubeconfig: None,
        }
    }
}

impl KubectlConfig {
    /// Arguments prepended to every kubectl command line.
    pub fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(ref context) = self.context {
            args.push("--context".into());
            args.push(context.clone());
        }
        if let Some(ref kubeconfig) = self.kubeconfig {
            args.push("--kubeconfig".into());
            args.push(kubeconfig.display().to_string());
        }
        args
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub read_secs: u64,
    pub tool_secs: u64,
    pub logs_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read_secs: 10,
            tool_secs: 15,
            logs_secs: 30,
        }
    }
}

impl TimeoutConfig {
    /// Every budget must be at least one second.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("read_secs", self.read_secs),
            ("tool_secs", self.tool_secs),
            ("logs_secs", self.logs_secs),
        ];
        match fields.iter().find(|(_, secs)| *secs == 0) {
            Some((name, _)) => Err(format!("timeouts.{name} must be greater than zero")),
            None => Ok(()),
        }
    }

    pub fn read(&self) -> Duration {
        Duration::from_secs(self.read_secs)
    }

    pub fn tool(&self) -> Duration {
        Duration::from_secs(self.tool_secs)
    }

    pub fn logs(&self) -> Duration {
        Duration::from_secs(self.logs_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    pub tail_lines: u32,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self { tail_lines: 50 }
    }
}
