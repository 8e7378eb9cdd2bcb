//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use std::sync::Arc;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use msp_service::{FileStore, Services};
use tracing::debug;

use crate::config::Config;
use crate::logging;
use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load()?;

    // Flag, then config file, then built-in default
    let output_format = cli
        .output
        .or(config.output_format)
        .unwrap_or(OutputFormat::Pretty);

    // --data-dir (or MSPCTL_DATA_DIR), then config, then the platform data dir
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => config.resolve_data_dir()?,
    };
    debug!(data_dir = %data_dir.display(), "using record store");

    let store = Arc::new(FileStore::new(data_dir.clone()));
    let ctx = commands::Context {
        services: Services::with_defaults(store, config.subject_defaults()),
        output_format,
        data_dir,
    };

    match cli.command {
        Commands::Org(args) => commands::org::execute(ctx, args).await,
        Commands::Identity(args) => commands::identity::execute(ctx, args).await,
        Commands::Export(args) => commands::export::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
    }
}
