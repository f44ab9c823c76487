use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use backup_bucket::load_config::{load_config, DEFAULT_RETENTION_DAYS};

/// This test ensures that a full static config produces a valid Config.
#[test]
fn test_load_config_success_full_schema() {
    let config_yaml = r#"
backup:
  source_dir: /etc/myapp
  staging_dir: /var/backups/myapp
  state_file: /var/lib/myapp/last_run
retention:
  days: 21
remote:
  bucket: myapp-backups
  server_name: web-01
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    let config = load_config(config_file.path()).expect("Config should load");

    assert_eq!(config.source_dir, PathBuf::from("/etc/myapp"));
    assert_eq!(config.staging_dir, PathBuf::from("/var/backups/myapp"));
    assert_eq!(config.state_file, PathBuf::from("/var/lib/myapp/last_run"));
    assert_eq!(config.retention_days, 21);
    assert_eq!(config.remote.bucket, "myapp-backups");
    assert_eq!(config.remote.server_name, "web-01");
}

/// This test ensures optional keys get their documented defaults: the marker
/// lands next to the staged archives and retention falls back to the default.
#[test]
fn test_load_config_defaults_for_optional_keys() {
    let config_yaml = r#"
backup:
  source_dir: ./data
  staging_dir: ./staging
remote:
  bucket: myapp-backups
  server_name: web-02
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    let config = load_config(config_file.path()).expect("Config should load with defaults");

    assert_eq!(config.state_file, PathBuf::from("./staging/last_run"));
    assert_eq!(config.retention_days, DEFAULT_RETENTION_DAYS);
}

/// This test ensures that a missing required section causes failure.
#[test]
fn test_load_config_errors_on_missing_remote_section() {
    let config_yaml = r#"
backup:
  source_dir: ./data
  staging_dir: ./staging
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    let err = load_config(config_file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("remote"), "Expected missing-field error, got: {msg}");
}

/// This test ensures that if the config file is not valid YAML, load_config
/// errors and reports as such.
#[test]
fn test_load_config_errors_for_invalid_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), b"not-yaml: [:::").unwrap();

    let err = load_config(config_file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

/// This test ensures a missing config file reports the path in the error.
#[test]
fn test_load_config_errors_for_missing_file() {
    let err = load_config("/definitely/not/here.yaml").unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("Failed to read config file"),
        "Read error expected, got: {msg}"
    );
}
