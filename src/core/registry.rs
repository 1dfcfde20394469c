//! Static table of advertised resources and tools.
//!
//! Descriptors and their kubectl templates live side by side in the same
//! entry, so nothing can be advertised without a command behind it.

use serde::Serialize;

/// One token of a kubectl argument template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    Lit(&'static str),
    /// Value of a named tool parameter.
    Param(&'static str),
    /// `-n <ns>` when the named parameter holds a namespace, `--all-namespaces`
    /// when it is absent or `all`.
    Scope(&'static str),
    /// `--tail=<N>` from the configured log tail limit.
    Tail,
}

/// Argument template for one kubectl invocation.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub args: &'static [Arg],
}

impl CommandSpec {
    /// Parameter names the template substitutes.
    pub fn params(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.args.iter().filter_map(|arg| match arg {
            Arg::Param(name) | Arg::Scope(name) => Some(*name),
            Arg::Lit(_) | Arg::Tail => None,
        })
    }
}

/// Which configured timeout bounds an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutClass {
    Read,
    Tool,
    Logs,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceDescriptor {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub required: bool,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl ToolDescriptor {
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn required(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.required)
    }
}

/// A labelled sub-command of a comparison tool.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub label: &'static str,
    pub command: CommandSpec,
}

/// What a tool executes.
#[derive(Debug, Clone, Copy)]
pub enum ToolPlan {
    Single(CommandSpec),
    /// Independent commands run in order; each result is reported under its label.
    Compare {
        /// Heading line; `{name}` placeholders are filled from arguments.
        title: &'static str,
        sections: &'static [Section],
    },
}

impl ToolPlan {
    pub fn commands(&self) -> Vec<CommandSpec> {
        match self {
            Self::Single(spec) => vec![*spec],
            Self::Compare { sections, .. } => sections.iter().map(|s| s.command).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResourceEntry {
    pub descriptor: ResourceDescriptor,
    pub command: CommandSpec,
}

#[derive(Debug, Clone)]
pub struct ToolEntry {
    pub descriptor: ToolDescriptor,
    pub plan: ToolPlan,
    pub timeout: TimeoutClass,
}

/// The resource/tool surface served by the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    pub resources: &'static [ResourceEntry],
    pub tools: &'static [ToolEntry],
}

impl Registry {
    /// The canonical Kubernetes surface.
    pub fn kubernetes() -> Self {
        Self {
            resources: RESOURCES,
            tools: TOOLS,
        }
    }

    pub fn resource(&self, uri: &str) -> Option<&'static ResourceEntry> {
        self.resources.iter().find(|e| e.descriptor.uri == uri)
    }

    pub fn tool(&self, name: &str) -> Option<&'static ToolEntry> {
        self.tools.iter().find(|e| e.descriptor.name == name)
    }
}

const JSON: &str = "application/json";

const RESOURCES: &[ResourceEntry] = &[
    ResourceEntry {
        descriptor: ResourceDescriptor {
            uri: "k8s://pods",
            name: "Kubernetes Pods",
            description: "All pods in the cluster with status and details",
            mime_type: JSON,
        },
        command: CommandSpec {
            args: &[
                Arg::Lit("get"),
                Arg::Lit("pods"),
                Arg::Lit("--all-namespaces"),
                Arg::Lit("-o"),
                Arg::Lit("json"),
            ],
        },
    },
    ResourceEntry {
        descriptor: ResourceDescriptor {
            uri: "k8s://services",
            name: "Kubernetes Services",
            description: "All services with endpoints and connectivity info",
            mime_type: JSON,
        },
        command: CommandSpec {
            args: &[
                Arg::Lit("get"),
                Arg::Lit("services"),
                Arg::Lit("--all-namespaces"),
                Arg::Lit("-o"),
                Arg::Lit("json"),
            ],
        },
    },
    ResourceEntry {
        descriptor: ResourceDescriptor {
            uri: "k8s://nodes",
            name: "Kubernetes Nodes",
            description: "Cluster nodes with health and capacity info",
            mime_type: JSON,
        },
        command: CommandSpec {
            args: &[Arg::Lit("get"), Arg::Lit("nodes"), Arg::Lit("-o"), Arg::Lit("json")],
        },
    },
    ResourceEntry {
        descriptor: ResourceDescriptor {
            uri: "k8s://events",
            name: "Kubernetes Events",
            description: "Recent cluster events for troubleshooting",
            mime_type: JSON,
        },
        command: CommandSpec {
            args: &[
                Arg::Lit("get"),
                Arg::Lit("events"),
                Arg::Lit("--all-namespaces"),
                Arg::Lit("-o"),
                Arg::Lit("json"),
            ],
        },
    },
    ResourceEntry {
        descriptor: ResourceDescriptor {
            uri: "k8s://deployments",
            name: "Kubernetes Deployments",
            description: "All deployments with replica status",
            mime_type: JSON,
        },
        command: CommandSpec {
            args: &[
                Arg::Lit("get"),
                Arg::Lit("deployments"),
                Arg::Lit("--all-namespaces"),
                Arg::Lit("-o"),
                Arg::Lit("json"),
            ],
        },
    },
];

const TOOLS: &[ToolEntry] = &[
    ToolEntry {
        descriptor: ToolDescriptor {
            name: "cluster_health_check",
            description: "Perform comprehensive cluster health check",
            params: &[],
        },
        plan: ToolPlan::Single(CommandSpec {
            args: &[Arg::Lit("get"), Arg::Lit("pods"), Arg::Lit("--all-namespaces")],
        }),
        timeout: TimeoutClass::Tool,
    },
    ToolEntry {
        descriptor: ToolDescriptor {
            name: "check_pod_status",
            description: "Check pod status and identify issues",
            params: &[ParamSpec {
                name: "namespace",
                kind: "string",
                required: false,
                description: "Namespace to check (default: all)",
                default: None,
            }],
        },
        plan: ToolPlan::Single(CommandSpec {
            args: &[Arg::Lit("get"), Arg::Lit("pods"), Arg::Scope("namespace")],
        }),
        timeout: TimeoutClass::Tool,
    },
    ToolEntry {
        descriptor: ToolDescriptor {
            name: "analyze_service_connectivity",
            description: "Analyze service endpoints and connectivity",
            params: &[
                ParamSpec {
                    name: "service_name",
                    kind: "string",
                    required: true,
                    description: "Service name to analyze",
                    default: None,
                },
                ParamSpec {
                    name: "namespace",
                    kind: "string",
                    required: false,
                    description: "Namespace of the service (default: default)",
                    default: Some("default"),
                },
            ],
        },
        plan: ToolPlan::Compare {
            title: "Service Analysis for {service_name} in {namespace}:",
            sections: &[
                Section {
                    label: "Service Info",
                    command: CommandSpec {
                        args: &[
                            Arg::Lit("get"),
                            Arg::Lit("service"),
                            Arg::Param("service_name"),
                            Arg::Lit("-n"),
                            Arg::Param("namespace"),
                            Arg::Lit("-o"),
                            Arg::Lit("json"),
                        ],
                    },
                },
                Section {
                    label: "Endpoints Info",
                    command: CommandSpec {
                        args: &[
                            Arg::Lit("get"),
                            Arg::Lit("endpoints"),
                            Arg::Param("service_name"),
                            Arg::Lit("-n"),
                            Arg::Param("namespace"),
                            Arg::Lit("-o"),
                            Arg::Lit("json"),
                        ],
                    },
                },
            ],
        },
        timeout: TimeoutClass::Tool,
    },
    ToolEntry {
        descriptor: ToolDescriptor {
            name: "get_pod_logs",
            description: "Retrieve the most recent log lines of a pod",
            params: &[
                ParamSpec {
                    name: "pod_name",
                    kind: "string",
                    required: true,
                    description: "Name of the pod",
                    default: None,
                },
                ParamSpec {
                    name: "namespace",
                    kind: "string",
                    required: true,
                    description: "Namespace of the pod",
                    default: None,
                },
            ],
        },
        plan: ToolPlan::Single(CommandSpec {
            args: &[
                Arg::Lit("logs"),
                Arg::Param("pod_name"),
                Arg::Lit("-n"),
                Arg::Param("namespace"),
                Arg::Tail,
            ],
        }),
        timeout: TimeoutClass::Logs,
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn resource_uris_are_stable() {
        let uris: Vec<_> = Registry::kubernetes()
            .resources
            .iter()
            .map(|e| e.descriptor.uri)
            .collect();
        assert_eq!(
            uris,
            vec![
                "k8s://pods",
                "k8s://services",
                "k8s://nodes",
                "k8s://events",
                "k8s://deployments",
            ]
        );
    }

    #[test]
    fn tool_names_are_stable() {
        let names: Vec<_> = Registry::kubernetes()
            .tools
            .iter()
            .map(|e| e.descriptor.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "cluster_health_check",
                "check_pod_status",
                "analyze_service_connectivity",
                "get_pod_logs",
            ]
        );
    }

    #[test]
    fn identifiers_are_unique() {
        let registry = Registry::kubernetes();
        let uris: HashSet<_> = registry.resources.iter().map(|e| e.descriptor.uri).collect();
        let names: HashSet<_> = registry.tools.iter().map(|e| e.descriptor.name).collect();
        assert_eq!(uris.len(), registry.resources.len());
        assert_eq!(names.len(), registry.tools.len());
    }

    #[test]
    fn every_entry_has_an_executable_command() {
        let registry = Registry::kubernetes();
        for entry in registry.resources {
            assert!(!entry.command.args.is_empty(), "{}", entry.descriptor.uri);
            assert_eq!(entry.command.params().count(), 0, "resources take no parameters");
        }
        for entry in registry.tools {
            let commands = entry.plan.commands();
            assert!(!commands.is_empty(), "{}", entry.descriptor.name);
            assert!(commands.iter().all(|c| !c.args.is_empty()));
        }
    }

    #[test]
    fn template_parameters_are_declared() {
        for entry in Registry::kubernetes().tools {
            for command in entry.plan.commands() {
                for param in command.params() {
                    assert!(
                        entry.descriptor.param(param).is_some(),
                        "{} uses undeclared parameter {param}",
                        entry.descriptor.name
                    );
                }
            }
        }
    }

    #[test]
    fn resource_reads_request_json() {
        for entry in Registry::kubernetes().resources {
            assert!(entry.command.args.ends_with(&[Arg::Lit("-o"), Arg::Lit("json")]));
            assert_eq!(entry.descriptor.mime_type, "application/json");
        }
    }

    #[test]
    fn lookup_misses_return_none() {
        let registry = Registry::kubernetes();
        assert!(registry.resource("k8s://secrets").is_none());
        assert!(registry.tool("delete_pod").is_none());
        assert_eq!(
            registry.tool("get_pod_logs").map(|e| e.timeout),
            Some(TimeoutClass::Logs)
        );
    }
}
