use crate::cli::OutputFormat;
use crate::cli::display;
use crate::cli::output::output;
use kobs::core::registry::Registry;

pub fn resources(format: OutputFormat) -> anyhow::Result<()> {
    let resources: Vec<_> = Registry::kubernetes()
        .resources
        .iter()
        .map(|e| &e.descriptor)
        .collect();
    output(&resources, format, &mut std::io::stdout(), |r| {
        display::render_resources(r)
    })
}

pub fn tools(format: OutputFormat) -> anyhow::Result<()> {
    let tools: Vec<_> = Registry::kubernetes()
        .tools
        .iter()
        .map(|e| &e.descriptor)
        .collect();
    output(&tools, format, &mut std::io::stdout(), |t| display::render_tools(t))
}
