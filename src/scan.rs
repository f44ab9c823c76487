//! Changed-file enumeration: walk the source tree and collect regular files
//! modified after the last recorded run.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A file that changed since the last run.
#[derive(Debug, Clone)]
pub struct ChangedFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the source directory, used as the archive entry name.
    pub relative: PathBuf,
    pub modified: DateTime<Utc>,
}

/// Walks `source_dir` and returns all regular files with a modification time
/// strictly after `since`, sorted by relative path so archive entries come out
/// in a stable order.
///
/// Unreadable entries are skipped with a warning rather than aborting the
/// whole run; a missing source directory yields an empty result.
pub fn find_changed_files(source_dir: &Path, since: DateTime<Utc>) -> Result<Vec<ChangedFile>> {
    if !source_dir.exists() {
        warn!(
            source_dir = %source_dir.display(),
            "Source directory does not exist, nothing to scan"
        );
        return Ok(Vec::new());
    }

    let mut changed = Vec::new();
    for entry in WalkDir::new(source_dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = ?e, "Skipping unreadable entry during scan");
                continue;
            }
        };
        // Symlinks are not followed and never archived.
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
        if modified <= since {
            continue;
        }

        let relative = match entry.path().strip_prefix(source_dir) {
            Ok(relative) => relative.to_path_buf(),
            Err(e) => {
                warn!(error = ?e, path = %entry.path().display(), "Entry outside source root, skipping");
                continue;
            }
        };
        changed.push(ChangedFile {
            path: entry.into_path(),
            relative,
            modified,
        });
    }

    changed.sort_by(|a, b| a.relative.cmp(&b.relative));
    debug!(count = changed.len(), since = %since, "Collected changed files");
    Ok(changed)
}
