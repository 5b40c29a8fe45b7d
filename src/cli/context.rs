//! Command execution context
//!
//! Loads configuration and builds the shared service once per invocation.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::{CallContext, RestletClient};
use crate::config::Config;
use crate::error::Result;
use crate::service::RequisitionService;

/// Context for command execution containing config, service, and runtime options.
pub struct CommandContext {
    /// Configuration as read from the environment
    pub config: Config,
    /// Requisition operations over the restlet client
    pub service: Arc<RequisitionService<RestletClient>>,
    /// Output format preference
    pub format: OutputFormat,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl CommandContext {
    /// Build the context from the environment.
    ///
    /// An incomplete configuration still yields a context; calls through it
    /// fail with `NotConfigured`. Ctrl+C cancels any call in flight.
    pub async fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::from_env();
        let client = RestletClient::from_config(&config)?;
        let service = Arc::new(RequisitionService::new(Arc::new(client)));

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Interrupted, cancelling in-flight calls");
                token.cancel();
            }
        });

        Ok(Self {
            config,
            service,
            format: opts.format,
            timeout: opts.timeout,
            cancel,
        })
    }

    /// Call context carrying the `--timeout` deadline and Ctrl+C cancellation.
    pub fn call(&self) -> CallContext {
        let ctx = CallContext::background().with_cancellation(self.cancel.clone());
        match self.timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}
