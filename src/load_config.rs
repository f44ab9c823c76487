//! `load_config` module: loads and adapts a static YAML config into the
//! internal [`Config`].
//!
//! This module is the only place where untrusted YAML is parsed and mapped to
//! strongly-typed internal structs. Optional keys (`backup.state_file`,
//! `retention.days`) get their defaults injected here so the rest of the
//! pipeline never deals with missing values.
//!
//! # Errors
//! All errors use `anyhow::Error` for context-rich diagnostics and are
//! surfaced at the CLI boundary.
//!
//! For the accepted YAML schema, see the README.

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::{Config, RemoteConfig};

/// Retention window applied when the config has no `retention` section.
pub const DEFAULT_RETENTION_DAYS: u32 = 15;

#[derive(Debug, Deserialize)]
struct RawConfig {
    backup: BackupSection,
    retention: Option<RetentionSection>,
    remote: RemoteSection,
}

#[derive(Debug, Deserialize)]
struct BackupSection {
    source_dir: PathBuf,
    staging_dir: PathBuf,
    #[serde(default)]
    state_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RetentionSection {
    days: u32,
}

#[derive(Debug, Deserialize)]
struct RemoteSection {
    bucket: String,
    server_name: String,
}

/// Loads a static YAML config file and fills in defaults for optional keys.
/// Returns a processable [`Config`] for use by the CLI.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    // The marker lives next to the staged archives unless placed explicitly.
    let state_file = raw
        .backup
        .state_file
        .unwrap_or_else(|| raw.backup.staging_dir.join("last_run"));

    let retention_days = match &raw.retention {
        Some(retention) => retention.days,
        None => {
            info!(
                days = DEFAULT_RETENTION_DAYS,
                "No retention section in config, using default"
            );
            DEFAULT_RETENTION_DAYS
        }
    };

    Ok(Config {
        source_dir: raw.backup.source_dir,
        staging_dir: raw.backup.staging_dir,
        state_file,
        retention_days,
        remote: RemoteConfig {
            bucket: raw.remote.bucket,
            server_name: raw.remote.server_name,
        },
    })
}
