//! High-level pipeline: orchestrates one incremental backup run.
//!
//! The run is a fixed sequence over filesystem metadata:
//!   1. Read the last-run marker.
//!   2. Enumerate files modified since then.
//!   3. Stage the changed files into a zip archive.
//!   4. Upload the archive via an [`Uploader`].
//!   5. Remove the staged archive.
//!   6. Prune source files past the retention window.
//!   7. Write the current time to the marker.
//!
//! When nothing changed, steps 3-5 are skipped but pruning and the marker
//! update still happen. An upload failure is logged and recorded in the
//! report; it does not abort the run, so local retention keeps being
//! enforced even while the remote side is down.
//!
//! # Callable From
//! Used by the CLI crate entrypoint and by integration tests, which pass a
//! mock [`Uploader`].

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::{error, info};

use crate::archive;
use crate::config::Config;
use crate::prune;
use crate::scan;
use crate::state;
use crate::upload::{self, Uploader};

/// Runtime flags for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackupOptions {
    /// Scan and report only: no archive, no upload, no deletion, no marker
    /// update.
    pub dry_run: bool,
}

/// Outcome of one pipeline run, for logging and downstream audit.
#[derive(Debug)]
pub struct BackupReport {
    /// The marker value the run started from.
    pub last_run: DateTime<Utc>,
    /// Number of files modified since `last_run`.
    pub changed: usize,
    /// Archive details, present when anything was staged.
    pub archive: Option<ArchiveReport>,
    /// Number of files removed (or, on a dry run, eligible) by pruning.
    pub pruned: usize,
    pub pruned_bytes: u64,
    /// Marker value written at the end of the run; `None` on a dry run.
    pub marker: Option<DateTime<Utc>>,
    pub dry_run: bool,
}

/// What happened to the staged archive.
#[derive(Debug)]
pub struct ArchiveReport {
    pub name: String,
    pub size_bytes: u64,
    /// Remote object key, present when the upload succeeded.
    pub remote_key: Option<String>,
    /// Upload failure, recorded rather than propagated.
    pub upload_error: Option<String>,
}

/// Entrypoint: run the pipeline according to config.
pub async fn run_backup<U>(
    config: &Config,
    uploader: &U,
    options: BackupOptions,
) -> Result<BackupReport>
where
    U: Uploader + Sync,
{
    info!(
        source_dir = %config.source_dir.display(),
        dry_run = options.dry_run,
        "Starting backup pipeline"
    );

    // Step 1: last-run marker.
    let last_run = state::read_last_run(&config.state_file)?;
    info!(last_run = %last_run, "Resolved last run time");

    // Step 2: enumerate changed files.
    let changed = scan::find_changed_files(&config.source_dir, last_run)?;

    let mut archive_report = None;
    if changed.is_empty() {
        info!("No new or updated files to upload");
    } else if options.dry_run {
        info!(
            files = changed.len(),
            "Dry run: would archive and upload changed files"
        );
    } else {
        // Step 3: stage the archive.
        let started = Utc::now();
        let staged = archive::create_archive(&config.staging_dir, &changed, started)?;

        // Step 4: upload. Failure is tolerated: the run still prunes and
        // advances the marker.
        let key = upload::object_key(&config.remote.server_name, started, &staged.name);
        let upload_error = match uploader.put_object(&key, &staged.path).await {
            Ok(()) => {
                info!(key = %key, "Upload succeeded");
                None
            }
            Err(e) => {
                error!(
                    error = %e,
                    key = %key,
                    "Upload failed, continuing with pruning and marker update"
                );
                Some(e.to_string())
            }
        };

        // Step 5: the staged archive goes away regardless of upload outcome.
        archive::remove_staged(&staged)?;

        archive_report = Some(ArchiveReport {
            name: staged.name,
            size_bytes: staged.size_bytes,
            remote_key: upload_error.is_none().then_some(key),
            upload_error,
        });
    }

    // Step 6: prune expired source files.
    let cutoff = Utc::now() - Duration::days(i64::from(config.retention_days));
    info!(cutoff = %cutoff, retention_days = config.retention_days, "Pruning expired files");
    let pruned = prune::prune_old_files(&config.source_dir, cutoff, options.dry_run)?;

    // Step 7: advance the marker. A file modified between the scan and this
    // write is skipped by the next run unless it changes again; that window
    // is accepted.
    let marker = if options.dry_run {
        None
    } else {
        let now = Utc::now();
        state::write_last_run(&config.state_file, now)?;
        Some(now)
    };

    let report = BackupReport {
        last_run,
        changed: changed.len(),
        archive: archive_report,
        pruned: pruned.removed.len(),
        pruned_bytes: pruned.bytes_freed,
        marker,
        dry_run: options.dry_run,
    };
    info!(?report, "Backup pipeline complete");
    Ok(report)
}
