//! Integration tests for ingot-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use ingot_core::test_utils::TarGzTestBuilder;
use ingot_core::test_utils::ZipTestBuilder;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

fn ingot_cmd() -> Command {
    cargo_bin_cmd!("ingot")
}

fn write_archive(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).expect("failed to write archive");
    path
}

fn sample_export() -> Vec<u8> {
    ZipTestBuilder::new()
        .add_file("export/conversations.json", b"[{\"id\": 1}]")
        .add_file("export/user.json", b"{}")
        .add_file("export/images/photo.png", b"\x89PNG fake")
        .add_file("export/audio/note.wav", b"RIFF fake")
        .build()
}

fn parse_stdout(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout should be JSON")
}

#[test]
fn test_version_flag() {
    ingot_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ingot"));
}

#[test]
fn test_help_flag() {
    ingot_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command-line utility"));
}

#[test]
fn test_ingest_help() {
    ingot_cmd()
        .args(["ingest", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--media-dir"))
        .stdout(predicate::str::contains("--skip-structure-check"));
}

#[test]
fn test_ingest_organizes_export() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "upload.zip", &sample_export());
    let export = temp.path().join("out");

    ingot_cmd()
        .arg("ingest")
        .arg(&archive)
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ingestion complete"));

    assert!(export.join("conversations.json").is_file());
    assert!(export.join("user.json").is_file());
    assert!(export.join("media/images/photo.png").is_file());
    assert!(export.join("media/audio/note.wav").is_file());
}

#[test]
fn test_ingest_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "upload.zip", &sample_export());
    let export = temp.path().join("out");

    let output = ingot_cmd()
        .arg("--json")
        .arg("ingest")
        .arg(&archive)
        .arg(&export)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value = parse_stdout(&output.stdout);
    assert_eq!(value["operation"], "ingest");
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["wrapper_folder"], "export");
    assert_eq!(value["data"]["media_copied"], 2);
    assert_eq!(value["data"]["markers_seen"], 1);
}

#[test]
fn test_ingest_custom_media_dir() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "upload.zip", &sample_export());
    let export = temp.path().join("out");
    let media = temp.path().join("assets");

    ingot_cmd()
        .arg("ingest")
        .arg(&archive)
        .arg(&export)
        .arg("--media-dir")
        .arg(&media)
        .assert()
        .success();

    assert!(media.join("images/photo.png").is_file());
    assert!(!export.join("media").exists());
}

#[test]
fn test_ingest_tar_gz() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let data = TarGzTestBuilder::new()
        .add_file("conversations.json", b"[]")
        .add_file("notes.txt", b"hello")
        .build();
    let archive = write_archive(temp.path(), "upload.tar.gz", &data);
    let export = temp.path().join("out");

    ingot_cmd()
        .arg("ingest")
        .arg(&archive)
        .arg(&export)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(export.join("notes.txt")).unwrap(),
        "hello"
    );
}

#[test]
fn test_ingest_quiet_prints_nothing() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "upload.zip", &sample_export());

    ingot_cmd()
        .arg("--quiet")
        .arg("ingest")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_ingest_custom_marker() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let data = ZipTestBuilder::new()
        .add_file("chat_history.json", b"[]")
        .build();
    let archive = write_archive(temp.path(), "upload.zip", &data);
    let export = temp.path().join("out");

    ingot_cmd()
        .arg("ingest")
        .arg(&archive)
        .arg(&export)
        .args(["--marker", "chat_history.json"])
        .assert()
        .success();

    assert!(export.join("chat_history.json").is_file());
}

#[test]
fn test_ingest_missing_marker() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let data = ZipTestBuilder::new().add_file("readme.txt", b"hi").build();
    let archive = write_archive(temp.path(), "upload.zip", &data);

    ingot_cmd()
        .arg("ingest")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not look like a conversation export"))
        .stderr(predicate::str::contains("--marker"));
}

#[test]
fn test_invalid_format_rejected() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "upload.zip", b"definitely not an archive");

    ingot_cmd()
        .arg("ingest")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Supported formats"));

    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_compression_bomb_json_code() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let data = ZipTestBuilder::new()
        .add_file("conversations.json", b"[]")
        .add_deflated_file("zeros.bin", &vec![0u8; 8 * 1024 * 1024])
        .build();
    let archive = write_archive(temp.path(), "bomb.zip", &data);

    let output = ingot_cmd()
        .arg("--json")
        .arg("ingest")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let value = parse_stdout(&output.stdout);
    assert_eq!(value["status"], "error");
    assert_eq!(value["code"], "COMPRESSION_BOMB");
    assert!(value["error"].as_str().unwrap().contains("decompression bomb"));
}

#[test]
fn test_max_entries_flag() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "upload.zip", &sample_export());

    let output = ingot_cmd()
        .arg("--json")
        .arg("ingest")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .args(["--max-entries", "2"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(parse_stdout(&output.stdout)["code"], "TOO_MANY_FILES");
}

#[test]
fn test_max_upload_size_flag() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "upload.zip", &sample_export());

    ingot_cmd()
        .arg("ingest")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .args(["--max-upload-size", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-upload-size"));
}

#[test]
fn test_config_file_applies_limits() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "upload.zip", &sample_export());
    let config = temp.path().join("ingot.json");
    fs::write(&config, r#"{"limits": {"max_entry_count": 1}}"#).unwrap();

    let output = ingot_cmd()
        .arg("--json")
        .arg("check")
        .arg(&archive)
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(parse_stdout(&output.stdout)["code"], "TOO_MANY_FILES");
}

#[test]
fn test_check_accepts_export() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "upload.zip", &sample_export());

    ingot_cmd()
        .arg("check")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive is acceptable"))
        .stdout(predicate::str::contains("zip"));
}

#[test]
fn test_check_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_archive(temp.path(), "upload.zip", &sample_export());

    let output = ingot_cmd()
        .args(["check", "--json"])
        .arg(&archive)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value = parse_stdout(&output.stdout);
    assert_eq!(value["operation"], "check");
    assert_eq!(value["data"]["format"], "zip");
    assert_eq!(value["data"]["entry_count"], 4);
}

#[test]
fn test_check_rejects_traversal() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let data = TarGzTestBuilder::new()
        .add_file("conversations.json", b"[]")
        .add_raw_file("../../escape.txt", b"pwned")
        .build();
    let archive = write_archive(temp.path(), "evil.tar.gz", &data);

    let output = ingot_cmd()
        .args(["check", "--json"])
        .arg(&archive)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(parse_stdout(&output.stdout)["code"], "UNSAFE_PATH");
    assert!(!temp.path().parent().unwrap().join("escape.txt").exists());
}

#[test]
fn test_missing_archive() {
    let temp = TempDir::new().expect("failed to create temp dir");

    ingot_cmd()
        .arg("check")
        .arg(temp.path().join("nope.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_missing_archive_json_has_no_code() {
    let temp = TempDir::new().expect("failed to create temp dir");

    let output = ingot_cmd()
        .args(["check", "--json"])
        .arg(temp.path().join("nope.zip"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let value = parse_stdout(&output.stdout);
    assert_eq!(value["status"], "error");
    assert!(value.get("code").is_none());
}
