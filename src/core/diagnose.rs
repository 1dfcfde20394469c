//! Setup verification and the cluster debugging report.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::exec::Kubectl;
use super::text;

const RECENT_EVENTS: usize = 5;
const TOP_POD_LINES: usize = 6;
const METRICS_HINT: &str = "metrics-server not available; install with: kubectl apply -f \
    https://github.com/kubernetes-sigs/metrics-server/releases/latest/download/components.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl Check {
    fn new(name: &str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            detail: detail.into(),
        }
    }
}

/// Walk through client, cluster, nodes and optionally one namespace.
///
/// Stops after the client check when kubectl itself cannot run.
pub async fn verify(kubectl: &Kubectl, namespace: Option<&str>, timeout: Duration) -> Vec<Check> {
    let mut checks = Vec::new();

    match kubectl.output(&["version", "--client"], timeout).await {
        Ok(out) => {
            let version = text::head(&out, 1).first().map(|l| l.trim().to_string());
            checks.push(Check::new(
                "kubectl",
                CheckStatus::Ok,
                version.unwrap_or_else(|| "installed".into()),
            ));
        }
        Err(e) => {
            checks.push(Check::new("kubectl", CheckStatus::Fail, e.to_string()));
            return checks;
        }
    }

    checks.push(match kubectl.output(&["cluster-info"], timeout).await {
        Ok(_) => Check::new("cluster", CheckStatus::Ok, "reachable"),
        Err(e) => Check::new("cluster", CheckStatus::Fail, e.to_string()),
    });

    checks.push(match kubectl.output(&["get", "nodes"], timeout).await {
        Ok(out) => {
            let nodes = text::data_rows(&out).len();
            if nodes == 0 {
                Check::new("nodes", CheckStatus::Warn, "no nodes registered")
            } else {
                Check::new("nodes", CheckStatus::Ok, format!("{nodes} available"))
            }
        }
        Err(e) => Check::new("nodes", CheckStatus::Fail, e.to_string()),
    });

    if let Some(ns) = namespace {
        checks.push(match kubectl.output(&["get", "pods", "-n", ns], timeout).await {
            Ok(out) => {
                let pods = text::data_rows(&out).len();
                if pods == 0 {
                    Check::new("namespace", CheckStatus::Warn, format!("no pods in {ns}"))
                } else {
                    Check::new("namespace", CheckStatus::Ok, format!("{pods} pods in {ns}"))
                }
            }
            Err(e) => Check::new("namespace", CheckStatus::Fail, e.to_string()),
        });
    }

    checks
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub lines: Vec<String>,
    /// Set when the section's data could not be collected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ReportSection {
    fn new(title: &str) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            note: None,
        }
    }

    fn with_lines<'a>(mut self, lines: impl IntoIterator<Item = &'a str>) -> Self {
        self.lines = lines.into_iter().map(|l| l.trim_end().to_string()).collect();
        self
    }

    fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<ReportSection>,
}

/// Readiness of one service's endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointHealth {
    Ready(usize),
    NoneReady,
    NoEndpoints,
    Unavailable,
}

impl EndpointHealth {
    pub fn from_endpoints(doc: &serde_json::Value) -> Self {
        match text::ready_endpoint_addresses(doc) {
            Some(0) => Self::NoneReady,
            Some(n) => Self::Ready(n),
            None => Self::NoEndpoints,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Ready(n) => format!("{n} ready endpoints"),
            Self::NoneReady => "no ready endpoints".into(),
            Self::NoEndpoints => "no endpoints".into(),
            Self::Unavailable => "could not retrieve endpoints".into(),
        }
    }
}

/// Collect problem pods, recent events, service endpoints and resource usage.
pub async fn debug_report(kubectl: &Kubectl, timeout: Duration) -> Report {
    let sections = vec![
        problem_pods(kubectl, timeout).await,
        recent_events(kubectl, timeout).await,
        service_endpoints(kubectl, timeout).await,
        node_usage(kubectl, timeout).await,
        pod_usage(kubectl, timeout).await,
    ];
    Report {
        generated_at: Utc::now(),
        sections,
    }
}

async fn problem_pods(kubectl: &Kubectl, timeout: Duration) -> ReportSection {
    let section = ReportSection::new("Problem pods");
    let args = [
        "get",
        "pods",
        "--all-namespaces",
        "--field-selector=status.phase!=Running",
    ];
    match kubectl.output(&args, timeout).await {
        Ok(out) => {
            let rows = text::data_rows(&out);
            if rows.is_empty() {
                section.with_note("no problematic pods found")
            } else {
                section.with_lines(rows)
            }
        }
        Err(e) => section.with_note(e.to_string()),
    }
}

async fn recent_events(kubectl: &Kubectl, timeout: Duration) -> ReportSection {
    let section = ReportSection::new("Recent events");
    let args = ["get", "events", "--all-namespaces", "--sort-by=.lastTimestamp"];
    match kubectl.output(&args, timeout).await {
        Ok(out) if text::data_rows(&out).is_empty() => section.with_note("no events"),
        Ok(out) => section.with_lines(text::tail(&out, RECENT_EVENTS)),
        Err(e) => section.with_note(e.to_string()),
    }
}

async fn service_endpoints(kubectl: &Kubectl, timeout: Duration) -> ReportSection {
    let section = ReportSection::new("Service endpoints");
    let services = match kubectl
        .output(&["get", "services", "--all-namespaces", "-o", "json"], timeout)
        .await
    {
        Ok(out) => out,
        Err(e) => return section.with_note(e.to_string()),
    };
    let services: serde_json::Value = match serde_json::from_str(&services) {
        Ok(v) => v,
        Err(e) => return section.with_note(format!("unparseable service list: {e}")),
    };

    let mut lines = Vec::new();
    for (namespace, name) in text::item_names(&services) {
        let health = match kubectl
            .output(&["get", "endpoints", name.as_str(), "-n", namespace.as_str(), "-o", "json"], timeout)
            .await
            .ok()
            .and_then(|out| serde_json::from_str::<serde_json::Value>(&out).ok())
        {
            Some(doc) => EndpointHealth::from_endpoints(&doc),
            None => EndpointHealth::Unavailable,
        };
        lines.push(format!("{name} ({namespace}): {}", health.describe()));
    }

    if lines.is_empty() {
        return section.with_note("no services found");
    }
    ReportSection {
        lines,
        ..section
    }
}

async fn node_usage(kubectl: &Kubectl, timeout: Duration) -> ReportSection {
    let section = ReportSection::new("Node resource usage");
    match kubectl.output(&["top", "nodes"], timeout).await {
        Ok(out) => section.with_lines(text::non_empty_lines(&out)),
        Err(e) => {
            tracing::debug!(error = %e, "kubectl top nodes failed");
            section.with_note(METRICS_HINT)
        }
    }
}

async fn pod_usage(kubectl: &Kubectl, timeout: Duration) -> ReportSection {
    let section = ReportSection::new("Pod resource usage");
    match kubectl.output(&["top", "pods", "--all-namespaces"], timeout).await {
        Ok(out) => section.with_lines(text::head(&out, TOP_POD_LINES)),
        Err(e) => {
            tracing::debug!(error = %e, "kubectl top pods failed");
            section.with_note("pod metrics not available")
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::exec::testing::{fake_kubectl, kubectl_at};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn endpoint_health_classification() {
        let ready = json!({"subsets": [{"addresses": [{"ip": "10.0.0.1"}]}]});
        let none_ready = json!({"subsets": [{"notReadyAddresses": [{"ip": "10.0.0.1"}]}]});
        assert_eq!(EndpointHealth::from_endpoints(&ready), EndpointHealth::Ready(1));
        assert_eq!(EndpointHealth::from_endpoints(&none_ready), EndpointHealth::NoneReady);
        assert_eq!(EndpointHealth::from_endpoints(&json!({})), EndpointHealth::NoEndpoints);
        assert_eq!(EndpointHealth::Ready(2).describe(), "2 ready endpoints");
    }

    #[tokio::test]
    async fn verify_stops_when_kubectl_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let kubectl = kubectl_at(&dir.path().join("absent"));
        let checks = verify(&kubectl, Some("test-mcp"), TIMEOUT).await;
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].name, "kubectl");
        assert_eq!(checks[0].status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn verify_reports_each_step() {
        let dir = tempfile::tempdir().unwrap();
        let kubectl = kubectl_at(&fake_kubectl(
            dir.path(),
            r#"case "$1" in
  version) echo "Client Version: v1.30.2" ;;
  cluster-info) echo "Kubernetes control plane is running" ;;
  get)
    if [ "$2" = "nodes" ]; then
      printf 'NAME STATUS\nkind-control-plane Ready\n'
    else
      printf 'NAME READY\n'
    fi ;;
esac"#,
        ));

        let checks = verify(&kubectl, Some("test-mcp"), TIMEOUT).await;
        let summary: Vec<_> = checks.iter().map(|c| (c.name.as_str(), c.status)).collect();
        assert_eq!(
            summary,
            vec![
                ("kubectl", CheckStatus::Ok),
                ("cluster", CheckStatus::Ok),
                ("nodes", CheckStatus::Ok),
                ("namespace", CheckStatus::Warn),
            ]
        );
        assert_eq!(checks[0].detail, "Client Version: v1.30.2");
        assert_eq!(checks[2].detail, "1 available");
    }

    #[tokio::test]
    async fn debug_report_degrades_per_section() {
        let dir = tempfile::tempdir().unwrap();
        let kubectl = kubectl_at(&fake_kubectl(
            dir.path(),
            r#"case "$1 $2" in
  "get pods") printf 'NAMESPACE NAME STATUS\ndefault web-0 Pending\n' ;;
  "get events") printf 'NAMESPACE LAST SEEN\na 1\nb 2\nc 3\nd 4\ne 5\nf 6\n' ;;
  "get services") echo '{"items":[{"metadata":{"name":"web","namespace":"default"}}]}' ;;
  "get endpoints") echo '{"subsets":[{"addresses":[{"ip":"10.1.0.4"}]}]}' ;;
  *) echo "error: Metrics API not available" >&2; exit 1 ;;
esac"#,
        ));

        let report = debug_report(&kubectl, TIMEOUT).await;
        let titles: Vec<_> = report.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Problem pods",
                "Recent events",
                "Service endpoints",
                "Node resource usage",
                "Pod resource usage",
            ]
        );

        assert_eq!(report.sections[0].lines, vec!["default web-0 Pending"]);
        assert_eq!(report.sections[1].lines.len(), RECENT_EVENTS);
        assert_eq!(report.sections[1].lines[4], "f 6");
        assert_eq!(report.sections[2].lines, vec!["web (default): 1 ready endpoints"]);
        assert!(report.sections[3].note.as_deref().unwrap().contains("metrics-server"));
        assert!(report.sections[4].lines.is_empty());
    }
}
