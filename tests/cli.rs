use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;

/// Helper to get a temporary config directory
fn temp_config_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get config file path in the temp dir
fn config_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".cellquality").join("config.json")
}

const BINARY_NAME: &str = "cellquality";

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("Terminal client"))
        .stdout(contains("export"));
}

#[test]
/// An export invocation needs a known dashboard kind.
fn export_rejects_unknown_kind() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("export").arg("widgets");
    cmd.assert().failure();
}

#[test]
/// Zone-stats exports require a zone.
fn zone_stats_export_requires_zone() {
    let tmp = temp_config_dir();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("export")
        .arg("zone-stats")
        .env("HOME", tmp.path())
        .assert()
        .failure()
        .stderr(contains("--zone"));
}

#[test]
/// Configure command should create the config file.
fn configure_creates_config_file() {
    let tmp = temp_config_dir();
    let config_path = config_file_path(&tmp);
    assert!(!config_path.exists());

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("configure")
        .arg("--server-url")
        .arg("http://qcs.plant.local:5000")
        .arg("--page-size")
        .arg("250")
        .env("HOME", tmp.path()) // simulate different $HOME
        .assert()
        .success()
        .stdout(contains("Configuration saved"));

    assert!(config_path.exists());
    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("http://qcs.plant.local:5000"));
    assert!(saved.contains("250"));
}

#[test]
/// Reset command should delete an existing config file.
fn reset_deletes_config_file() {
    let tmp = temp_config_dir();
    let config_path = config_file_path(&tmp);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, "{}").unwrap();
    assert!(config_path.exists());

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("reset")
        .env("HOME", tmp.path()) // simulate different $HOME
        .assert()
        .success()
        .stdout(contains("Clearing client configuration"));

    assert!(!config_path.exists());
}

#[test]
#[ignore] // Requires a reachable quality-system server.
fn cells_page_loads_against_live_server() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("cells")
        .arg("--server-url")
        .arg("http://localhost:5000")
        .assert()
        .success();
}
