//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod context;
pub mod create;
pub mod lookup;
pub mod serve;
pub mod sign;
pub mod status;

pub use args::{CreateArgs, OutputFormat};
pub use context::CommandContext;

/// reqgate - purchase requisitions against a NetSuite restlet
#[derive(Parser, Debug)]
#[command(name = "reqgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "REQGATE_FORMAT",
        default_value = "table",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long, global = true, env = "REQGATE_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Load environment from this file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Per-call timeout in seconds (capped at 20)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show restlet configuration status
    Status,

    /// Print the OAuth signature for a request without sending it
    Sign {
        /// HTTP method
        #[arg(long, default_value = "GET")]
        method: String,

        /// URL to sign (defaults to the configured restlet URL)
        #[arg(long)]
        url: Option<String>,

        /// Fixed nonce instead of a random one
        #[arg(long, requires = "timestamp")]
        nonce: Option<String>,

        /// Fixed Unix timestamp instead of the current time
        #[arg(long, requires = "nonce")]
        timestamp: Option<i64>,
    },

    /// List employees (cached for 5 minutes)
    Employees,

    /// List locations (cached for 5 minutes)
    Locations,

    /// Search items by name or SKU
    Items {
        /// Search text
        query: String,
    },

    /// Search vendors by name
    Vendors {
        /// Search text
        query: String,
    },

    /// List vendors and purchase prices for an item
    ItemVendors {
        /// Item internal id
        item_id: String,
    },

    /// Show an employee's requisition history
    Requests {
        /// Employee internal id
        employee_id: String,
    },

    /// Submit a purchase requisition
    Create(CreateArgs),

    /// Run the JSON HTTP server
    Serve {
        /// Listen port (defaults to $PORT, then 8080)
        #[arg(long, short = 'p')]
        port: Option<u16>,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Display version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_create_parses_items() {
        let cli = Cli::parse_from([
            "reqgate",
            "create",
            "--requestor",
            "7",
            "--subsidiary",
            "1",
            "--item",
            "100:2",
            "--item",
            "200:1:42",
        ]);
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.items.len(), 2);
                assert_eq!(args.items[1].vendor_id.as_deref(), Some("42"));
            }
            other => panic!("Expected Create, got {:?}", other),
        }
    }

    #[test]
    fn test_create_rejects_both_item_sources() {
        let result = Cli::try_parse_from([
            "reqgate",
            "create",
            "--requestor",
            "7",
            "--subsidiary",
            "1",
            "--item",
            "100:2",
            "--items-json",
            "[]",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_sign_nonce_requires_timestamp() {
        assert!(Cli::try_parse_from(["reqgate", "sign", "--nonce", "abc"]).is_err());
        assert!(
            Cli::try_parse_from(["reqgate", "sign", "--nonce", "abc", "--timestamp", "1"]).is_ok()
        );
    }
}
