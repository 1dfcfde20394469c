//! Resolve argument templates into concrete kubectl command lines.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{KobsError, Result};

use super::registry::{Arg, CommandSpec, ToolDescriptor};

/// Namespace value that selects `--all-namespaces` in a scope token.
pub const ALL_NAMESPACES: &str = "all";

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// True when `needle` appears as consecutive arguments.
    pub fn contains(&self, needle: &[&str]) -> bool {
        !needle.is_empty() && self.args.windows(needle.len()).any(|w| w == needle)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let program = self
            .program
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| self.program.to_string_lossy());
        write!(f, "{program}")?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Validated tool arguments: every value is a plain string, defaults applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolArgs {
    values: HashMap<String, String>,
}

impl ToolArgs {
    /// Validate raw JSON arguments against a tool's parameter list.
    ///
    /// Null and empty values count as absent. All missing required parameters
    /// are reported together.
    pub fn validate(tool: &ToolDescriptor, raw: &serde_json::Map<String, Value>) -> Result<Self> {
        let mut values = HashMap::new();
        let mut missing = Vec::new();

        for spec in tool.params {
            let value = match raw.get(spec.name) {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.trim().to_string()),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(Value::Bool(b)) => Some(b.to_string()),
                Some(Value::Array(_) | Value::Object(_)) => {
                    return Err(KobsError::InvalidParameter {
                        tool: tool.name.into(),
                        param: spec.name.into(),
                        reason: "expected a string".into(),
                    });
                }
            };

            match value.filter(|v| !v.is_empty()) {
                Some(v) if v.starts_with('-') => {
                    return Err(KobsError::InvalidParameter {
                        tool: tool.name.into(),
                        param: spec.name.into(),
                        reason: format!("'{v}' looks like a flag"),
                    });
                }
                Some(v) => {
                    values.insert(spec.name.to_string(), v);
                }
                None if spec.required => missing.push(spec.name.to_string()),
                None => {
                    if let Some(default) = spec.default {
                        values.insert(spec.name.to_string(), default.to_string());
                    }
                }
            }
        }

        if !missing.is_empty() {
            return Err(KobsError::MissingParameter {
                tool: tool.name.into(),
                params: missing,
            });
        }

        for name in raw.keys() {
            if tool.param(name).is_none() {
                tracing::debug!(tool = tool.name, param = %name, "ignoring unknown parameter");
            }
        }

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Fill `{name}` placeholders in a heading.
    ///
    /// One left-to-right pass: substituted values are never rescanned, and
    /// braces that do not name a known argument are kept as written.
    pub fn interpolate(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let placeholder = after
                .find('}')
                .and_then(|close| self.get(&after[..close]).map(|value| (close, value)));
            match placeholder {
                Some((close, value)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Settings every resolution needs besides the template itself.
#[derive(Debug, Clone)]
pub struct Resolver {
    pub program: PathBuf,
    pub global_args: Vec<String>,
    pub tail_lines: u32,
}

impl Resolver {
    pub fn new(program: &Path, global_args: Vec<String>, tail_lines: u32) -> Self {
        Self {
            program: program.to_path_buf(),
            global_args,
            tail_lines,
        }
    }

    /// Substitute arguments into the template owned by `owner` (a tool name
    /// or resource URI).
    ///
    /// Parameters are validated before resolution, so a `Param` token with no
    /// value means the owner's table entry is inconsistent.
    pub fn resolve(&self, owner: &str, spec: &CommandSpec, args: &ToolArgs) -> Result<CommandLine> {
        let mut out = self.global_args.clone();
        for arg in spec.args {
            match *arg {
                Arg::Lit(lit) => out.push(lit.to_string()),
                Arg::Param(name) => match args.get(name) {
                    Some(value) => out.push(value.to_string()),
                    None => {
                        return Err(KobsError::MissingParameter {
                            tool: owner.into(),
                            params: vec![name.to_string()],
                        });
                    }
                },
                Arg::Scope(name) => match args.get(name) {
                    Some(ns) if ns != ALL_NAMESPACES => {
                        out.push("-n".into());
                        out.push(ns.to_string());
                    }
                    _ => out.push("--all-namespaces".into()),
                },
                Arg::Tail => out.push(format!("--tail={}", self.tail_lines)),
            }
        }
        Ok(CommandLine::new(self.program.clone(), out))
    }

    /// Build an ad-hoc kubectl command line from literal arguments.
    pub fn literal(&self, args: &[&str]) -> CommandLine {
        let mut out = self.global_args.clone();
        out.extend(args.iter().map(|a| a.to_string()));
        CommandLine::new(self.program.clone(), out)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::registry::{Arg, Registry, ToolPlan};

    fn resolver() -> Resolver {
        Resolver::new(Path::new("kubectl"), Vec::new(), 50)
    }

    fn raw(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn single(tool: &str, args: Value) -> Result<CommandLine> {
        let entry = Registry::kubernetes().tool(tool).unwrap();
        let args = ToolArgs::validate(&entry.descriptor, &raw(args))?;
        match entry.plan {
            ToolPlan::Single(spec) => resolver().resolve(tool, &spec, &args),
            ToolPlan::Compare { .. } => panic!("{tool} is a comparison tool"),
        }
    }

    #[test]
    fn explicit_namespace_scopes_pod_status() {
        let cmd = single("check_pod_status", json!({"namespace": "ns1"})).unwrap();
        assert!(cmd.contains(&["-n", "ns1"]));
        assert!(!cmd.args.contains(&"--all-namespaces".to_string()));
        insta::assert_snapshot!(cmd.to_string(), @"kubectl get pods -n ns1");
    }

    #[test]
    fn absent_namespace_selects_all() {
        let cmd = single("check_pod_status", json!({})).unwrap();
        assert!(cmd.args.contains(&"--all-namespaces".to_string()));
        assert!(!cmd.args.contains(&"-n".to_string()));
    }

    #[test]
    fn literal_all_selects_all() {
        let cmd = single("check_pod_status", json!({"namespace": "all"})).unwrap();
        insta::assert_snapshot!(cmd.to_string(), @"kubectl get pods --all-namespaces");
    }

    #[test]
    fn pod_logs_requires_both_parameters() {
        let err = single("get_pod_logs", json!({})).unwrap_err();
        match err {
            KobsError::MissingParameter { tool, params } => {
                assert_eq!(tool, "get_pod_logs");
                assert_eq!(params, vec!["pod_name", "namespace"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_and_null_values_count_as_missing() {
        let err = single("get_pod_logs", json!({"pod_name": "", "namespace": null})).unwrap_err();
        assert_eq!(err.payload()["missing"], json!(["pod_name", "namespace"]));
    }

    #[test]
    fn pod_logs_uses_configured_tail() {
        let cmd = single("get_pod_logs", json!({"pod_name": "web-0", "namespace": "shop"})).unwrap();
        insta::assert_snapshot!(cmd.to_string(), @"kubectl logs web-0 -n shop --tail=50");
    }

    #[test]
    fn flag_like_values_are_rejected() {
        let err = single("check_pod_status", json!({"namespace": "--kubeconfig=/tmp/x"})).unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
    }

    #[test]
    fn structured_values_are_rejected() {
        let err = single("check_pod_status", json!({"namespace": ["a", "b"]})).unwrap_err();
        assert!(matches!(err, KobsError::InvalidParameter { ref param, .. } if param == "namespace"));
    }

    #[test]
    fn service_namespace_defaults_to_default() {
        let entry = Registry::kubernetes().tool("analyze_service_connectivity").unwrap();
        let args = ToolArgs::validate(&entry.descriptor, &raw(json!({"service_name": "svc1"}))).unwrap();
        assert_eq!(args.get("namespace"), Some("default"));
        assert_eq!(
            args.interpolate("Service Analysis for {service_name} in {namespace}:"),
            "Service Analysis for svc1 in default:"
        );
    }

    #[test]
    fn interpolation_does_not_rescan_values() {
        let entry = Registry::kubernetes().tool("analyze_service_connectivity").unwrap();
        let args = ToolArgs::validate(
            &entry.descriptor,
            &raw(json!({"service_name": "{namespace}", "namespace": "shop"})),
        )
        .unwrap();
        for _ in 0..20 {
            assert_eq!(
                args.interpolate("Service Analysis for {service_name} in {namespace}:"),
                "Service Analysis for {namespace} in shop:"
            );
        }
        assert_eq!(args.interpolate("{unknown} {namespace"), "{unknown} {namespace");
    }

    #[test]
    fn inconsistent_template_names_its_owner() {
        let spec = CommandSpec {
            args: &[Arg::Lit("logs"), Arg::Param("pod_name")],
        };
        let err = resolver()
            .resolve("get_pod_logs", &spec, &ToolArgs::default())
            .unwrap_err();
        match err {
            KobsError::MissingParameter { tool, params } => {
                assert_eq!(tool, "get_pod_logs");
                assert_eq!(params, vec!["pod_name"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn global_args_come_first() {
        let resolver = Resolver::new(
            Path::new("/usr/local/bin/kubectl"),
            vec!["--context".into(), "kind-dev".into()],
            10,
        );
        let cmd = resolver.literal(&["get", "nodes"]);
        assert_eq!(cmd.args, vec!["--context", "kind-dev", "get", "nodes"]);
        assert_eq!(cmd.to_string(), "kubectl --context kind-dev get nodes");
    }

    #[test]
    fn display_quotes_whitespace() {
        let cmd = CommandLine::new("kubectl", vec!["get".into(), "a b".into()]);
        assert_eq!(cmd.to_string(), "kubectl get 'a b'");
    }
}
