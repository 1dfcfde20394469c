pub mod format;
pub mod resources;
pub mod server;
pub mod tools;

use rmcp::ServiceExt;

use kobs::config;
use kobs::core::dispatcher::Dispatcher;
use server::KobsServer;

/// Start the MCP server over stdio. Blocks until the connection closes.
pub fn serve_stdio() -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let cfg = config::load_config()?;
        tracing::info!(
            binary = %cfg.kubectl.binary.display(),
            context = cfg.kubectl.context.as_deref().unwrap_or("-"),
            "starting kobs MCP server"
        );

        let server = KobsServer::new(Dispatcher::from_config(&cfg));
        let service = server.serve(rmcp::transport::stdio()).await?;
        service.waiting().await?;

        tracing::info!("MCP session closed");
        Ok(())
    })
}
