//! Integration tests for the run policy and the binary's exit codes.
//!
//! # Purpose
//!
//! The policy scenarios use `touch <file>` as the post-check command: whether
//! the file exists afterwards tells us whether the command ran.
//!
//! | Policy | Endpoint     | File created? | `run` result      |
//! |--------|--------------|---------------|-------------------|
//! | `s`    | connects     | yes           | `Ok`              |
//! | `s`    | times out    | no            | the timeout error |
//! | `f`    | times out    | yes           | `Ok` (touch's)    |
//! | `any`  | connects     | yes           | `Ok`              |
//!
//! The second half runs the compiled `tcpwait` binary to check the exit-code
//! contract end to end.

#![cfg(unix)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use tcpwait::application::{build_config, run, RunError, EXIT_INVALID_USAGE};
use tcpwait::domain::{Settings, WaitConfig};
use tcpwait_core::WaitError;

// ── Helpers ───────────────────────────────────────────────────────────────────

async fn start_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });
    addr
}

fn free_addr() -> SocketAddr {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind")
        .local_addr()
        .expect("local addr")
}

async fn config_for(addr: SocketAddr, on: &str, marker: &Path) -> WaitConfig {
    build_config(Settings {
        addresses: vec![addr.to_string()],
        timeout: Some(Duration::from_millis(100)),
        interval: Some(Duration::from_millis(100)),
        on: Some(on.to_string()),
        quiet: true,
        command: vec!["touch".to_string(), marker.to_string_lossy().into_owned()],
        ..Default::default()
    })
    .await
    .expect("valid settings")
}

fn marker_in(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("test")
}

// ── Policy scenarios ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_on_success_runs_command_after_connect() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let marker = marker_in(&dir);
    let cfg = config_for(start_listener().await, "s", &marker).await;

    // Act
    let result = run(&cfg, &CancellationToken::new()).await;

    // Assert
    assert!(result.is_ok(), "got {result:?}");
    assert!(marker.exists(), "command did not run");
}

#[tokio::test]
async fn test_on_success_skips_command_after_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let marker = marker_in(&dir);
    let cfg = config_for(free_addr(), "s", &marker).await;

    let result = run(&cfg, &CancellationToken::new()).await;

    assert!(
        matches!(result, Err(RunError::Wait(WaitError::DeadlineExceeded))),
        "got {result:?}"
    );
    assert!(!marker.exists(), "command ran after a failed wait");
}

#[tokio::test]
async fn test_on_failure_runs_command_after_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let marker = marker_in(&dir);
    let cfg = config_for(free_addr(), "f", &marker).await;

    let result = run(&cfg, &CancellationToken::new()).await;

    // The command's own success replaces the wait failure.
    assert!(result.is_ok(), "got {result:?}");
    assert!(marker.exists(), "command did not run after failure");
}

#[tokio::test]
async fn test_on_failure_skips_command_after_connect() {
    let dir = tempfile::tempdir().unwrap();
    let marker = marker_in(&dir);
    let cfg = config_for(start_listener().await, "f", &marker).await;

    let result = run(&cfg, &CancellationToken::new()).await;

    assert!(result.is_ok());
    assert!(!marker.exists());
}

#[tokio::test]
async fn test_on_any_runs_command_after_connect() {
    let dir = tempfile::tempdir().unwrap();
    let marker = marker_in(&dir);
    let cfg = config_for(start_listener().await, "any", &marker).await;

    assert!(run(&cfg, &CancellationToken::new()).await.is_ok());
    assert!(marker.exists());
}

// ── Binary exit codes ─────────────────────────────────────────────────────────

fn tcpwait() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tcpwait"))
}

#[test]
fn test_binary_without_endpoints_exits_invalid_usage() {
    let status = tcpwait().arg("-q").status().expect("run tcpwait");
    assert_eq!(status.code(), Some(i32::from(EXIT_INVALID_USAGE)));
}

#[test]
fn test_binary_unknown_policy_exits_invalid_usage() {
    let status = tcpwait()
        .args(["-q", "-a", "127.0.0.1:1", "--on", "w"])
        .status()
        .expect("run tcpwait");
    assert_eq!(status.code(), Some(i32::from(EXIT_INVALID_USAGE)));
}

#[test]
fn test_binary_out_of_range_port_exits_invalid_usage() {
    let status = tcpwait()
        .args(["-q", "-a", "localhost:99999"])
        .status()
        .expect("run tcpwait");
    assert_eq!(status.code(), Some(i32::from(EXIT_INVALID_USAGE)));
}

#[test]
fn test_binary_timeout_exits_one() {
    let addr = free_addr().to_string();
    let status = tcpwait()
        .args(["-q", "-t", "100ms", "-i", "50ms", "-a", &addr])
        .status()
        .expect("run tcpwait");
    assert_eq!(status.code(), Some(1));
}

#[tokio::test]
async fn test_binary_propagates_command_exit_code() {
    let addr = start_listener().await.to_string();

    let status = tokio::process::Command::new(env!("CARGO_BIN_EXE_tcpwait"))
        .args(["-q", "-t", "1s", "-a", &addr, "sh", "-c", "exit 5"])
        .status()
        .await
        .expect("run tcpwait");

    assert_eq!(status.code(), Some(5));
}

#[test]
fn test_binary_missing_config_file_prints_error_and_usage() {
    let output = tcpwait()
        .args(["--config", "/nonexistent/tcpwait.toml", "-a", "127.0.0.1:1"])
        .env_remove("RUST_LOG")
        .output()
        .expect("run tcpwait");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(i32::from(EXIT_INVALID_USAGE)));
    assert!(stderr.contains("/nonexistent/tcpwait.toml"), "stderr: {stderr}");
    assert!(stderr.contains("Usage:"), "stderr: {stderr}");
}

#[test]
fn test_binary_quiet_config_error_prints_nothing() {
    let output = tcpwait()
        .args(["-q", "--config", "/nonexistent/tcpwait.toml"])
        .output()
        .expect("run tcpwait");

    assert_eq!(output.status.code(), Some(i32::from(EXIT_INVALID_USAGE)));
    assert!(output.stderr.is_empty());
}

// ── Environment overrides ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_binary_reads_comma_separated_addresses_from_env() {
    // Arrange: unsplit, the text would be one address with too many colons
    let first = start_listener().await;
    let second = start_listener().await;

    // Act
    let status = tokio::process::Command::new(env!("CARGO_BIN_EXE_tcpwait"))
        .env("TCPWAIT_ADDRESSES", format!("{first},{second}"))
        .env("TCPWAIT_TIMEOUT", "2s")
        .arg("-q")
        .status()
        .await
        .expect("run tcpwait");

    // Assert
    assert_eq!(status.code(), Some(0));
}

#[tokio::test]
async fn test_binary_reads_timeout_from_env() {
    let mut child = tokio::process::Command::new(env!("CARGO_BIN_EXE_tcpwait"))
        .env("TCPWAIT_TIMEOUT", "100ms")
        .env("TCPWAIT_INTERVAL", "50ms")
        .args(["-q", "-a", &free_addr().to_string()])
        .kill_on_drop(true)
        .spawn()
        .expect("spawn tcpwait");

    let status = tokio::time::timeout(Duration::from_secs(5), child.wait())
        .await
        .expect("TCPWAIT_TIMEOUT was ignored")
        .expect("wait for tcpwait");

    assert_eq!(status.code(), Some(1));
}
