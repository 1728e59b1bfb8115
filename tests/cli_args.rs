//! Integration tests for CLI argument handling

use std::process::Command;

use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_watermelon-api"))
        .args(args)
        .env_remove("PERPLEXITY_API_KEY")
        .env_remove("OPENROUTER_API_KEY")
        .output()
        .expect("Failed to execute watermelon-api")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("watermelon-api"), "Help should mention the binary");
    assert!(stdout.contains("refresh"), "Help should list the refresh command");
    assert!(stdout.contains("clear-tickers"), "Help should list clear-tickers");
}

#[test]
fn test_unknown_command_fails() {
    let output = run_cli(&["frobnicate"]);
    assert!(!output.status.success(), "Expected unknown command to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unrecognized") || stderr.contains("invalid"),
        "Should print an error about the command: {}",
        stderr
    );
}

#[test]
fn test_clear_tickers_empties_cache_file() {
    let cache_dir = TempDir::new().unwrap();
    let ticker_file = cache_dir.path().join("ticker_cache.json");
    std::fs::write(
        &ticker_file,
        r#"{"timestamp":"2024-01-01T00:00:00Z","data":{"apple inc.":"AAPL","private co":null}}"#,
    )
    .unwrap();

    let output = run_cli(&[
        "clear-tickers",
        "--cache-dir",
        cache_dir.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cleared 2 ticker entries"), "got: {}", stdout);
    assert!(!ticker_file.exists());
}

#[test]
fn test_refresh_against_unreachable_upstream_fails() {
    let cache_dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_watermelon-api"))
        .args(["refresh", "--cache-dir", cache_dir.path().to_str().unwrap()])
        .env("WATERMELON_SNAPSHOT_URL", "http://127.0.0.1:9/getAppSnapshot")
        .env_remove("PERPLEXITY_API_KEY")
        .output()
        .expect("Failed to execute watermelon-api");

    assert!(!output.status.success(), "Refresh should fail without an upstream");
    assert!(!cache_dir.path().join("data_cache.json").exists());
}
