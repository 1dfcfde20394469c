use indicatif::ProgressBar;

use crate::cli::OutputFormat;
use crate::cli::display;
use crate::cli::output::output;
use kobs::config;
use kobs::core::diagnose::{self, CheckStatus};
use kobs::core::exec::Kubectl;

#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Also check that this namespace has pods
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,
}

pub async fn run(args: VerifyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    let kubectl = Kubectl::from_config(&cfg);

    let spinner = (format == OutputFormat::Human).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_message("verifying cluster access");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    });
    let checks = diagnose::verify(&kubectl, args.namespace.as_deref(), cfg.timeouts.read()).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    output(&checks, format, &mut std::io::stdout(), |c| display::render_checks(c))?;

    if checks.iter().any(|c| c.status == CheckStatus::Fail) {
        anyhow::bail!("verification failed");
    }
    Ok(())
}
