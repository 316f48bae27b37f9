#![cfg(feature = "server")]

use std::process::{Command, Stdio};
use tempfile::TempDir;

fn server_command(workdir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_edhrec-server"));
    cmd.current_dir(workdir.path())
        .env_remove("EDHREC_HOST")
        .env_remove("EDHREC_PORT")
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    cmd
}

#[test]
fn test_invalid_settings_file_exits_non_zero() {
    let workdir = TempDir::new().unwrap();
    let settings = workdir.path().join("broken.toml");
    std::fs::write(&settings, "[fetch\nconcurrent_requests = ").unwrap();

    let output = server_command(&workdir)
        .args(["--config", settings.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load settings"), "{}", stderr);
}

#[test]
fn test_out_of_range_settings_exit_non_zero() {
    let workdir = TempDir::new().unwrap();
    let settings = workdir.path().join("settings.toml");
    std::fs::write(&settings, "[fetch]\nconcurrent_requests = 0\n").unwrap();

    let output = server_command(&workdir)
        .args(["--config", settings.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn test_port_in_use_exits_non_zero() {
    let workdir = TempDir::new().unwrap();
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let output = server_command(&workdir)
        .args(["--host", "127.0.0.1", "--port", &port.to_string()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to bind"), "{}", stderr);
}
