//! CLI glue for backup-bucket: command parsing, argument exposure and the
//! async [`run`] entrypoint used by both `main()` and integration tests.
//! All pipeline logic lives in [`crate::backup`]; this module only wires
//! config loading, uploader construction and user-visible output together.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::backup::{run_backup, BackupOptions};
use crate::load_config::load_config;
use crate::upload::S3Uploader;

/// CLI for backup-bucket: incremental directory backups to object storage.
#[derive(Parser)]
#[clap(
    name = "backup-bucket",
    version,
    about = "Archive files changed since the last run, upload them to S3 and prune expired local copies"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one backup pass using the given config file
    Run {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Report what would happen without archiving, uploading or deleting
        #[clap(long)]
        dry_run: bool,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Run { config, dry_run } => {
            let config = load_config(config)?;
            config.trace_loaded();
            tracing::info!(command = "run", dry_run, "Starting backup process");

            let uploader = S3Uploader::from_env(config.remote.bucket.clone()).await;
            match run_backup(&config, &uploader, BackupOptions { dry_run }).await {
                Ok(report) => {
                    tracing::info!(command = "run", ?report, "Backup complete");
                    println!("Backup complete.\nReport:");
                    println!("{report:#?}");
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "run", error = %e, "Backup failed");
                    Err(e)
                }
            }
        }
    }
}
