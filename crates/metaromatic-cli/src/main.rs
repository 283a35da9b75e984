mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::config::PartialAppConfig;
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!(
        "🚀 Met-aromatic CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let config = PartialAppConfig::load(cli.detection.config.as_deref())?
        .merge_with_cli(&cli.detection)?;
    debug!("Effective configuration: {:?}", &config);

    let command_result = match cli.command {
        Commands::Query(args) => {
            info!("Dispatching to 'query' command.");
            commands::query::run(args, &config, cli.quiet).await
        }
        Commands::Bridges(args) => {
            info!("Dispatching to 'bridges' command.");
            commands::bridges::run(args, &config, cli.quiet).await
        }
        Commands::Batch(args) => {
            info!("Dispatching to 'batch' command.");
            commands::batch::run(args, &config, cli.quiet).await
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
