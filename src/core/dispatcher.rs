//! Resolve resource URIs and tool names to kubectl invocations.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::types::{KobsConfig, TimeoutConfig};
use crate::error::{KobsError, Result};

use super::command::{CommandLine, ToolArgs};
use super::exec::Kubectl;
use super::registry::{Registry, ResourceDescriptor, TimeoutClass, ToolDescriptor, ToolPlan};

/// A tool call resolved down to its command lines.
#[derive(Debug, Clone)]
pub struct ResolvedTool {
    /// Budget applied to each command the tool runs.
    pub timeout: TimeoutClass,
    pub plan: ResolvedPlan,
}

#[derive(Debug, Clone)]
pub enum ResolvedPlan {
    Single(CommandLine),
    Compare {
        title: String,
        sections: Vec<(&'static str, CommandLine)>,
    },
}

impl ResolvedTool {
    pub fn commands(&self) -> Vec<&CommandLine> {
        match &self.plan {
            ResolvedPlan::Single(cmd) => vec![cmd],
            ResolvedPlan::Compare { sections, .. } => sections.iter().map(|(_, cmd)| cmd).collect(),
        }
    }
}

/// Serves the four registry operations. Built once at startup; holds no
/// mutable state, so one instance is shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Registry,
    kubectl: Kubectl,
    timeouts: TimeoutConfig,
}

impl Dispatcher {
    pub fn new(registry: Registry, kubectl: Kubectl, timeouts: TimeoutConfig) -> Self {
        Self {
            registry,
            kubectl,
            timeouts,
        }
    }

    pub fn from_config(cfg: &KobsConfig) -> Self {
        Self::new(
            Registry::kubernetes(),
            Kubectl::from_config(cfg),
            cfg.timeouts.clone(),
        )
    }

    pub fn kubectl(&self) -> &Kubectl {
        &self.kubectl
    }

    pub fn list_resources(&self) -> Vec<&'static ResourceDescriptor> {
        self.registry.resources.iter().map(|e| &e.descriptor).collect()
    }

    pub fn list_tools(&self) -> Vec<&'static ToolDescriptor> {
        self.registry.tools.iter().map(|e| &e.descriptor).collect()
    }

    pub fn resolve_resource(&self, uri: &str) -> Result<CommandLine> {
        let entry = self
            .registry
            .resource(uri)
            .ok_or_else(|| KobsError::UnknownResource(uri.to_string()))?;
        self.kubectl
            .resolver()
            .resolve(uri, &entry.command, &ToolArgs::default())
    }

    /// Validate arguments and resolve every command a tool would run.
    pub fn resolve_tool(&self, name: &str, arguments: &Map<String, Value>) -> Result<ResolvedTool> {
        let entry = self
            .registry
            .tool(name)
            .ok_or_else(|| KobsError::UnknownTool(name.to_string()))?;
        let args = ToolArgs::validate(&entry.descriptor, arguments)?;
        let resolver = self.kubectl.resolver();

        let plan = match entry.plan {
            ToolPlan::Single(spec) => ResolvedPlan::Single(resolver.resolve(name, &spec, &args)?),
            ToolPlan::Compare { title, sections } => {
                let sections = sections
                    .iter()
                    .map(|s| Ok((s.label, resolver.resolve(name, &s.command, &args)?)))
                    .collect::<Result<Vec<_>>>()?;
                ResolvedPlan::Compare {
                    title: args.interpolate(title),
                    sections,
                }
            }
        };
        Ok(ResolvedTool {
            timeout: entry.timeout,
            plan,
        })
    }

    /// Run the query behind a resource URI and return its stdout verbatim.
    pub async fn read_resource(&self, uri: &str) -> Result<String> {
        let command = self.resolve_resource(uri)?;
        tracing::info!(uri, command = %command, "read_resource");
        self.kubectl
            .run(&command, self.timeout(TimeoutClass::Read))
            .await?
            .into_stdout(&command)
    }

    /// Run a tool and return its text result.
    ///
    /// Comparison tools never fail as a whole once resolved: each section's
    /// error is rendered inline under its own label.
    pub async fn call_tool(&self, name: &str, arguments: &Map<String, Value>) -> Result<String> {
        let resolved = self.resolve_tool(name, arguments)?;
        let timeout = self.timeout(resolved.timeout);
        tracing::info!(tool = name, "call_tool");

        match resolved.plan {
            ResolvedPlan::Single(command) => {
                self.kubectl.run(&command, timeout).await?.into_stdout(&command)
            }
            ResolvedPlan::Compare { title, sections } => {
                let mut text = format!("{title}\n");
                for (label, command) in &sections {
                    let body = self
                        .kubectl
                        .run(command, timeout)
                        .await
                        .and_then(|inv| inv.into_stdout(command))
                        .unwrap_or_else(|e| {
                            tracing::warn!(tool = name, section = label, error = %e, "section failed");
                            format!("Error: {e}")
                        });
                    text.push_str(&format!("\n{label}:\n{}\n", body.trim_end()));
                }
                Ok(text)
            }
        }
    }

    fn timeout(&self, class: TimeoutClass) -> Duration {
        match class {
            TimeoutClass::Read => self.timeouts.read(),
            TimeoutClass::Tool => self.timeouts.tool(),
            TimeoutClass::Logs => self.timeouts.logs(),
        }
    }
}
