use std::fs;
use std::process::{Command, Output};
use std::{env, path::PathBuf};

use tempfile::tempdir;

fn cli_bin_path() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_camready") {
        return PathBuf::from(path);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(PathBuf::from)
        .expect("workspace root");
    let bin_name = if cfg!(windows) {
        "camready.exe"
    } else {
        "camready"
    };
    let fallback = workspace_root.join("target").join("debug").join(bin_name);
    assert!(
        fallback.exists(),
        "camready binary not found at {}",
        fallback.display()
    );
    fallback
}

fn run_with_csv(csv: &str, base_url: &str, extra: &[&str]) -> Output {
    let dir = tempdir().expect("tempdir");
    let accepted = dir.path().join("accepted-papers.csv");
    fs::write(&accepted, csv).expect("write csv");
    Command::new(cli_bin_path())
        .args(["chair@example.org", "secret", "--accepted"])
        .arg(&accepted)
        .args(extra)
        .env("CAMREADY_BASE_URL", base_url)
        .env("CAMREADY_FETCH_RETRIES", "0")
        .env("CAMREADY_HTTP_TIMEOUT_MS", "2000")
        .env_remove("RUST_LOG")
        .output()
        .expect("run camready")
}

#[test]
fn malformed_accepted_table_exits_with_data_format_code() {
    // Given a CSV without the `Accepted To` column
    // When running camready
    // Then the run stops before contacting the platform with exit code 4.
    let output = run_with_csv("Paper ID,Title\n1,A\n", "http://127.0.0.1:1", &[]);

    assert_eq!(
        output.status.code(),
        Some(4),
        "stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing required column"));
    assert!(output.stdout.is_empty());
}

#[test]
fn unreachable_platform_exits_with_connection_code() {
    let output = run_with_csv(
        "Paper ID,Title,Accepted To\n1,A,Main\n",
        "http://127.0.0.1:1",
        &["--dry-run"],
    );

    assert_eq!(
        output.status.code(),
        Some(1),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("connection"));
}

#[test]
fn invalid_base_url_exits_with_internal_code() {
    let output = run_with_csv(
        "Paper ID,Title,Accepted To\n1,A,Main\n",
        "ftp://example.org",
        &[],
    );

    assert_eq!(output.status.code(), Some(70));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CAMREADY_BASE_URL"));
}

#[test]
fn unknown_flag_exits_with_usage_code() {
    let output = Command::new(cli_bin_path())
        .args(["chair@example.org", "secret", "--no-such-flag"])
        .output()
        .expect("run camready");

    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--no-such-flag"));
}

#[test]
fn help_exits_successfully() {
    let output = Command::new(cli_bin_path())
        .arg("--help")
        .output()
        .expect("run camready --help");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--venue"));
}

#[test]
fn json_mode_prints_error_payload_on_failure() {
    let output = run_with_csv("Paper ID\n1\n", "http://127.0.0.1:1", &["--json"]);

    assert_eq!(output.status.code(), Some(4));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json error payload");
    assert_eq!(payload["code"], "DATA_FORMAT");
    assert_eq!(payload["operation"], "camready.run");
}
