//! Retention pruning: delete source files whose modification time fell out of
//! the retention window. Directories are left in place.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// What a pruning pass removed (or, on a dry run, would remove).
#[derive(Debug, Default)]
pub struct PruneOutcome {
    pub removed: Vec<PathBuf>,
    pub bytes_freed: u64,
}

/// Walks `dir` and deletes every regular file modified strictly before
/// `cutoff`. On a dry run the candidates are only collected. Files that fail
/// to delete are logged and skipped; the pass keeps going.
pub fn prune_old_files(dir: &Path, cutoff: DateTime<Utc>, dry_run: bool) -> Result<PruneOutcome> {
    if !dir.exists() {
        warn!(dir = %dir.display(), "Prune directory does not exist, nothing to do");
        return Ok(PruneOutcome::default());
    }

    let mut outcome = PruneOutcome::default();
    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = ?e, "Skipping unreadable entry during pruning");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(error = ?e, path = %entry.path().display(), "Failed to read metadata, skipping");
                continue;
            }
        };
        let modified = match metadata.modified() {
            Ok(mtime) => DateTime::<Utc>::from(mtime),
            Err(e) => {
                warn!(error = ?e, path = %entry.path().display(), "No modification time available, skipping");
                continue;
            }
        };
        if modified >= cutoff {
            continue;
        }

        if dry_run {
            info!(file = %entry.path().display(), modified = %modified, "Would delete expired file");
        } else {
            match fs::remove_file(entry.path()) {
                Ok(()) => {
                    info!(file = %entry.path().display(), modified = %modified, "Deleted expired file");
                }
                Err(e) => {
                    warn!(error = ?e, file = %entry.path().display(), "Failed to delete expired file");
                    continue;
                }
            }
        }
        outcome.bytes_freed += metadata.len();
        outcome.removed.push(entry.into_path());
    }

    info!(
        removed = outcome.removed.len(),
        bytes_freed = outcome.bytes_freed,
        dry_run,
        "Retention pruning finished"
    );
    Ok(outcome)
}
