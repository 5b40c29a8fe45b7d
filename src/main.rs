//! reqgate - purchase requisitions against a NetSuite restlet

use clap::{CommandFactory, Parser};

mod cache;
mod cli;
mod client;
mod config;
mod error;
mod output;
mod server;
mod service;

use cli::args::GlobalOptions;
use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let opts = GlobalOptions::from_cli(&cli);

    init_logging(&cli);
    config::load_env_file(opts.env_file_ref());

    match cli.command {
        Commands::Status => cli::status::run(),
        Commands::Sign {
            method,
            url,
            nonce,
            timestamp,
        } => cli::sign::run(&opts, &method, url.as_deref(), nonce, timestamp),
        Commands::Employees => cli::lookup::employees(&opts).await,
        Commands::Locations => cli::lookup::locations(&opts).await,
        Commands::Items { query } => cli::lookup::items(&opts, &query).await,
        Commands::Vendors { query } => cli::lookup::vendors(&opts, &query).await,
        Commands::ItemVendors { item_id } => cli::lookup::item_vendors(&opts, &item_id).await,
        Commands::Requests { employee_id } => cli::lookup::requests(&opts, &employee_id).await,
        Commands::Create(args) => cli::create::run(&opts, args).await,
        Commands::Serve { port } => cli::serve::run(&opts, port).await,
        Commands::Completion { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "reqgate",
                &mut std::io::stdout(),
            );
            Ok(())
        }
        Commands::Version => {
            println!("reqgate version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// `RUST_LOG` wins; otherwise `--debug` selects debug, the server logs at
/// info and one-shot commands only surface warnings.
fn init_logging(cli: &Cli) {
    let default_level = if cli.debug {
        "debug"
    } else if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}
