//! Last-run marker persistence.
//!
//! The marker is a single-line file holding the RFC 3339 timestamp of the
//! last completed run. A missing marker is not an error: the first run falls
//! back to a fixed lookback window so it picks up recent files without
//! re-uploading the whole tree.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Lookback applied when no marker file exists yet.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// Reads the last run time from the marker file. If the file does not exist,
/// returns a timestamp [`DEFAULT_LOOKBACK_DAYS`] in the past. A marker that
/// exists but does not parse is an error: silently ignoring it would turn an
/// incremental backup into a partial one.
pub fn read_last_run(path: &Path) -> Result<DateTime<Utc>> {
    if !path.exists() {
        let fallback = Utc::now() - Duration::days(DEFAULT_LOOKBACK_DAYS);
        warn!(
            state_file = %path.display(),
            fallback = %fallback,
            "No last-run marker found, defaulting to lookback window"
        );
        return Ok(fallback);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read last-run marker {}", path.display()))?;
    let last_run = DateTime::parse_from_rfc3339(raw.trim())
        .with_context(|| format!("Invalid timestamp in last-run marker {}", path.display()))?
        .with_timezone(&Utc);

    debug!(state_file = %path.display(), last_run = %last_run, "Read last-run marker");
    Ok(last_run)
}

/// Writes the given timestamp to the marker file, creating the parent
/// directory if needed.
pub fn write_last_run(path: &Path, timestamp: DateTime<Utc>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "Failed to create directory for last-run marker {}",
                parent.display()
            )
        })?;
    }
    fs::write(path, timestamp.to_rfc3339())
        .with_context(|| format!("Failed to write last-run marker {}", path.display()))?;

    info!(state_file = %path.display(), last_run = %timestamp, "Updated last-run marker");
    Ok(())
}
