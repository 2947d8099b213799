//! End-to-end CLI tests for the library-dl binary.

use assert_cmd::Command;
use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MD5: &str = "1065812d567369000ccc1e985e4cadc2";

fn library_dl() -> Command {
    let mut cmd = Command::cargo_bin("library-dl").expect("binary built");
    cmd.env_remove("LIBRARY_KEY")
        .env_remove("LIBRARY_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    library_dl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve library catalog entries"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    library_dl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("library-dl"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    library_dl()
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_download_without_key_prints_remediation() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    library_dl()
        .args(["--base-url", "http://127.0.0.1:1", "download", MD5, "-o"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("LIBRARY_KEY not set"))
        .stderr(predicate::str::contains(r#"export LIBRARY_KEY="your-key-here""#));
}

#[test]
fn test_empty_identifier_is_rejected() {
    library_dl()
        .args(["info", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("identifier is empty"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_info_prints_fallback_title() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/md5/{MD5}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Example Book - Library</title></head><body></body></html>",
        ))
        .mount(&server)
        .await;
    let base_url = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        library_dl()
            .args(["-q", "--base-url", base_url.as_str(), "info", MD5])
            .output()
    })
    .await
    .expect("command thread")
    .expect("command runs");

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Example Book"))
        .stdout(predicate::str::contains("Fast mirrors (0):"))
        .stdout(predicate::str::contains("Slow mirrors (0):"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_download_prints_canonical_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dyn/api/fast_download.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"download_url":"{}/The%20Book%20--%20Some%20Provider.pdf"}}"#,
            server.uri()
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/The%20Book%20--%20Some%20Provider.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let output_dir = temp_dir.path().to_path_buf();
    let base_url = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        library_dl()
            .env("LIBRARY_KEY", "test-key")
            .args(["-q", "--base-url", base_url.as_str(), "download", MD5, "-o"])
            .arg(&output_dir)
            .output()
    })
    .await
    .expect("command thread")
    .expect("command runs");

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("1065812d.pdf"))
        .stdout(predicate::str::contains("Provider").not());
    assert!(temp_dir.path().join("1065812d.pdf").exists());
}
