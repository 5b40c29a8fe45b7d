//! Global CLI options shared across all commands

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{Cli, OutputFormat};
use crate::client::restlet::REQUEST_TIMEOUT;

/// Global CLI options passed to all command handlers.
///
/// Built once in `main.rs` after parsing. Precedence is CLI flag, then
/// environment variable, then default.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (table, json)
    pub format: OutputFormat,

    /// Dotenv file to load instead of `./.env`
    pub env_file: Option<PathBuf>,

    /// Caller deadline for each restlet call, capped at the gateway's own
    /// 20s limit.
    pub timeout: Option<Duration>,
}

impl GlobalOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            env_file: cli.env_file.clone(),
            timeout: cli
                .timeout
                .map(|secs| Duration::from_secs(secs).min(REQUEST_TIMEOUT)),
        }
    }

    pub fn env_file_ref(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }
}
