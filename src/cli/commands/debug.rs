use indicatif::ProgressBar;

use crate::cli::OutputFormat;
use crate::cli::display;
use crate::cli::output::output;
use kobs::config;
use kobs::core::diagnose;
use kobs::core::exec::Kubectl;

pub async fn run(format: OutputFormat) -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    let kubectl = Kubectl::from_config(&cfg);

    let spinner = (format == OutputFormat::Human).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_message("collecting cluster report");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    });
    let report = diagnose::debug_report(&kubectl, cfg.timeouts.tool()).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    output(&report, format, &mut std::io::stdout(), display::render_report)
}
