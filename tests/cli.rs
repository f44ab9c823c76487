use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{tempdir, NamedTempFile};

/// Writes a config pointing at a throwaway source/staging pair under `root`.
fn write_config(root: &std::path::Path) -> std::path::PathBuf {
    let config_path = root.join("config.yaml");
    let yaml = format!(
        "backup:\n  source_dir: {source}\n  staging_dir: {staging}\nretention:\n  days: 15\nremote:\n  bucket: myapp-backups\n  server_name: web-01\n",
        source = root.join("source").display(),
        staging = root.join("staging").display(),
    );
    fs::write(&config_path, yaml).expect("Writing temp config failed");
    config_path
}

#[test]
fn run_cli_fails_for_missing_config_file() {
    let mut cmd = Command::cargo_bin("backup-bucket").expect("Binary exists");

    cmd.arg("run").arg("--config").arg("/no/such/config.yaml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn run_cli_fails_for_unparseable_config() {
    let config = NamedTempFile::new().expect("Creating temp config file failed");
    fs::write(config.path(), b"backup: [:::\n").expect("Writing temp config failed");

    let mut cmd = Command::cargo_bin("backup-bucket").expect("Binary exists");

    cmd.arg("run").arg("--config").arg(config.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config YAML"));
}

#[test]
fn run_cli_dry_run_happy_flow_reports_without_writing() {
    let root = tempdir().expect("Creating temp dir failed");
    let source = root.path().join("source");
    fs::create_dir_all(&source).expect("Creating source dir failed");
    fs::write(source.join("app.conf"), "contents").expect("Writing source file failed");
    let config_path = write_config(root.path());

    let mut cmd = Command::cargo_bin("backup-bucket").expect("Binary exists");

    // Static dummy credentials keep the S3 client construction offline.
    cmd.arg("run")
        .arg("--config")
        .arg(&config_path)
        .arg("--dry-run")
        .env("AWS_ACCESS_KEY_ID", "dummy")
        .env("AWS_SECRET_ACCESS_KEY", "dummy")
        .env("AWS_REGION", "eu-west-1")
        .env("AWS_EC2_METADATA_DISABLED", "true");

    // Only assert the high-level banner; the report layout may vary.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Backup complete.").and(predicate::str::contains("Report:")));

    // A dry run leaves the filesystem untouched.
    assert!(source.join("app.conf").exists());
    assert!(!root.path().join("staging").exists());
}
