use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Runtime configuration for a backup run.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Directory tree that gets backed up and pruned.
    pub source_dir: PathBuf,
    /// Where zip archives are staged before upload.
    pub staging_dir: PathBuf,
    /// Marker file holding the timestamp of the last completed run.
    pub state_file: PathBuf,
    /// Files older than this many days are deleted from the source tree.
    pub retention_days: u32,
    pub remote: RemoteConfig,
}

/// Where uploads go.
#[derive(Debug, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Target S3 bucket name.
    pub bucket: String,
    /// Logical name of this machine, used as the leading key segment.
    pub server_name: String,
}

impl Config {
    pub fn trace_loaded(&self) {
        info!(
            source_dir = %self.source_dir.display(),
            staging_dir = %self.staging_dir.display(),
            state_file = %self.state_file.display(),
            retention_days = self.retention_days,
            bucket = %self.remote.bucket,
            server_name = %self.remote.server_name,
            "Loaded Config"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}
