//! Common test utilities for CLI tests.

use std::process::Command;

/// Run crm-joins with the given arguments.
///
/// The user's config file and `CRM_JOINS_DATABASE` are masked so only the
/// arguments decide which store is opened.
pub fn run_cli(args: &[&str]) -> (i32, String, String) {
    run_cli_with_log_filter(args, "warn")
}

/// Run crm-joins with an explicit `RUST_LOG` filter.
pub fn run_cli_with_log_filter(args: &[&str], filter: &str) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_crm-joins"))
        .args(args)
        .env("CRM_JOINS_CONFIG", "/nonexistent/crm-joins/config.toml")
        .env_remove("CRM_JOINS_DATABASE")
        .env("RUST_LOG", filter)
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}
