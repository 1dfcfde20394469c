use serde_json::{Value, json};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KobsError {
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("{tool}: missing required parameter(s): {}", .params.join(", "))]
    MissingParameter { tool: String, params: Vec<String> },

    #[error("{tool}: invalid value for '{param}': {reason}")]
    InvalidParameter {
        tool: String,
        param: String,
        reason: String,
    },

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("`{command}` exited with {}: {}", .status.map_or("signal".to_string(), |c| format!("status {c}")), .stderr.trim())]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl KobsError {
    /// Stable tag identifying the error family.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownResource(_) => "unknown_resource",
            Self::UnknownTool(_) => "unknown_tool",
            Self::MissingParameter { .. } => "missing_parameter",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::Spawn { .. } | Self::Timeout { .. } | Self::CommandFailed { .. } => {
                "upstream_failure"
            }
            Self::Config(_) => "config",
        }
    }

    /// True for failures of the external command rather than of the request.
    pub fn is_upstream(&self) -> bool {
        self.kind() == "upstream_failure"
    }

    /// Structured error document returned in-band to MCP clients.
    pub fn payload(&self) -> Value {
        let mut doc = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        let details = match self {
            Self::UnknownResource(uri) => json!({ "uri": uri }),
            Self::UnknownTool(name) => json!({ "tool": name }),
            Self::MissingParameter { tool, params } => json!({ "tool": tool, "missing": params }),
            Self::InvalidParameter { tool, param, .. } => json!({ "tool": tool, "param": param }),
            Self::Spawn { program, .. } => json!({ "command": program }),
            Self::Timeout { command, seconds } => {
                json!({ "command": command, "timeout_secs": seconds })
            }
            Self::CommandFailed {
                command,
                status,
                stderr,
            } => json!({ "command": command, "status": status, "stderr": stderr }),
            Self::Config(_) => json!({}),
        };
        if let (Some(doc), Value::Object(details)) = (doc.as_object_mut(), details) {
            doc.extend(details);
        }
        doc
    }
}

pub type Result<T> = std::result::Result<T, KobsError>;
