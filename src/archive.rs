//! Zip staging: bundle the changed files into a timestamped archive inside
//! the staging directory.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::scan::ChangedFile;

/// A zip archive staged on local disk, ready for upload.
#[derive(Debug, Clone)]
pub struct StagedArchive {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
}

/// Archive file name for a run started at `timestamp`.
pub fn archive_name(timestamp: DateTime<Utc>) -> String {
    format!("backup_{}.zip", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Creates a deflate-compressed zip of `files` in `staging_dir`, creating the
/// staging directory on demand. Entry names are the files' paths relative to
/// the source directory, `/`-separated regardless of platform.
pub fn create_archive(
    staging_dir: &Path,
    files: &[ChangedFile],
    timestamp: DateTime<Utc>,
) -> Result<StagedArchive> {
    fs::create_dir_all(staging_dir).with_context(|| {
        format!(
            "Failed to create staging directory {}",
            staging_dir.display()
        )
    })?;

    let name = archive_name(timestamp);
    let path = staging_dir.join(&name);
    info!(archive = %path.display(), files = files.len(), "Zipping changed files");

    let file = File::create(&path)
        .with_context(|| format!("Failed to create archive {}", path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for changed in files {
        let entry_name = zip_entry_name(&changed.relative);
        debug!(entry = %entry_name, "Adding archive entry");
        zip.start_file(entry_name.as_str(), options)
            .with_context(|| format!("Failed to start archive entry {entry_name}"))?;
        let contents = fs::read(&changed.path)
            .with_context(|| format!("Failed to read {}", changed.path.display()))?;
        zip.write_all(&contents)
            .with_context(|| format!("Failed to write archive entry {entry_name}"))?;
    }

    zip.finish()
        .with_context(|| format!("Failed to finish archive {}", path.display()))?;

    let size_bytes = fs::metadata(&path)
        .with_context(|| format!("Failed to stat archive {}", path.display()))?
        .len();
    info!(archive = %path.display(), size_bytes, "Created staged archive");

    Ok(StagedArchive {
        path,
        name,
        size_bytes,
    })
}

/// Deletes the staged archive from local disk.
pub fn remove_staged(archive: &StagedArchive) -> Result<()> {
    fs::remove_file(&archive.path).with_context(|| {
        format!(
            "Failed to remove staged archive {}",
            archive.path.display()
        )
    })?;
    debug!(archive = %archive.path.display(), "Removed staged archive");
    Ok(())
}

fn zip_entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
