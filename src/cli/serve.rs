//! Serve command implementation

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::error::Result;
use crate::server;

/// Run the HTTP server on `port`, or the configured `PORT`
pub async fn run(opts: &GlobalOptions, port: Option<u16>) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let port = port.unwrap_or(ctx.config.port);
    server::serve(ctx.service.clone(), port).await
}
