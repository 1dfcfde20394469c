use owo_colors::{OwoColorize, Style};

use kobs::core::diagnose::{Check, CheckStatus, Report};
use kobs::core::registry::{ResourceDescriptor, ToolDescriptor};

/// One line per resource: URI then description.
pub fn render_resources(resources: &[&ResourceDescriptor]) -> String {
    let width = resources.iter().map(|r| r.uri.len()).max().unwrap_or(0);
    resources
        .iter()
        .map(|r| format!("{:<width$}  {}", r.uri.bold(), r.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tool name and description, followed by its parameters.
pub fn render_tools(tools: &[&ToolDescriptor]) -> String {
    let mut lines = Vec::new();
    for tool in tools {
        lines.push(format!("{}  {}", tool.name.bold(), tool.description));
        for param in tool.params {
            let flag = if param.required { "required" } else { "optional" };
            let default = param
                .default
                .map(|d| format!(", default {d}"))
                .unwrap_or_default();
            lines.push(format!(
                "    {} ({flag}{default})  {}",
                param.name,
                param.description.dimmed()
            ));
        }
    }
    lines.join("\n")
}

pub fn status_style(status: CheckStatus) -> Style {
    match status {
        CheckStatus::Ok => Style::new().green(),
        CheckStatus::Warn => Style::new().yellow(),
        CheckStatus::Fail => Style::new().red().bold(),
    }
}

fn status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Ok => "ok",
        CheckStatus::Warn => "warn",
        CheckStatus::Fail => "FAIL",
    }
}

/// Checklist rendering for `kobs verify`.
pub fn render_checks(checks: &[Check]) -> String {
    checks
        .iter()
        .map(|c| {
            format!(
                "[{:>4}] {:<10} {}",
                status_label(c.status).style(status_style(c.status)),
                c.name,
                c.detail
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sectioned rendering for `kobs debug`.
pub fn render_report(report: &Report) -> String {
    let mut lines = vec![format!(
        "[debug] cluster report {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )];
    for section in &report.sections {
        lines.push(String::new());
        lines.push(format!("{}", section.title.bold()));
        for line in &section.lines {
            lines.push(format!("  {line}"));
        }
        if let Some(ref note) = section.note {
            lines.push(format!("  {}", note.dimmed()));
        }
    }
    lines.join("\n")
}
