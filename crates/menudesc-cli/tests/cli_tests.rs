//! Integration tests for the menudesc CLI
//!
//! These tests invoke the actual binary and verify:
//! - Exit codes (0 = success, 1 = invalid description, 2 = error)
//! - stdout/stderr output
//! - JSON output format
//! - stdin input

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

// ── Helpers ───────────────────────────────────────────────

fn menudesc_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_menudesc"))
}

fn fixture_valid(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(format!("../../tests/fixtures/valid/{}", name))
}

fn fixture_invalid(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(format!("../../tests/fixtures/invalid/{}", name))
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(menudesc_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to execute menudesc")
}

fn run_with_stdin(args: &[&str], input: &str) -> std::process::Output {
    let mut child = Command::new(menudesc_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn menudesc");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for menudesc")
}

fn path(p: &PathBuf) -> &str {
    p.to_str().unwrap()
}

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("menudesc"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "should contain version");
}

#[test]
fn test_version_flag() {
    let output = run(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

// ── Validate ──────────────────────────────────────────────

#[test]
fn test_validate_valid_menu() {
    let output = run(&["validate", path(&fixture_valid("nested.menu"))]);
    assert!(output.status.success(), "valid menu should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("valid"));
    assert!(stdout.contains("4 item(s)"));
}

#[test]
fn test_validate_out_of_order() {
    let output = run(&["validate", path(&fixture_invalid("out-of-order.menu"))]);
    assert_eq!(output.status.code(), Some(1), "invalid menu should exit 1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"));
    assert!(stderr.contains("out of order"));
    assert!(stderr.contains("1: >>>>cmd=oops"));
}

#[test]
fn test_validate_reports_line_number() {
    let output = run(&["validate", path(&fixture_invalid("bad-indent.menu"))]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(":4: keyword found at incorrect indentation"));
}

#[test]
fn test_validate_nonexistent_file() {
    let output = run(&["validate", "nonexistent.menu"]);
    assert_eq!(output.status.code(), Some(2), "missing file should exit 2");
}

#[test]
fn test_validate_json_output() {
    let output = run(&["validate", "--json", path(&fixture_valid("minimal.menu"))]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    assert_eq!(json["valid"], true);
    assert_eq!(json["items"], 1);
    assert_eq!(json["empty"], false);
}

#[test]
fn test_validate_json_invalid() {
    let output = run(&["validate", "--json", path(&fixture_invalid("missing-cmd.menu"))]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    assert_eq!(json["valid"], false);
    assert_eq!(json["line"], 2);
    assert_eq!(json["message"], "missing keyword 'cmd=' (after 'item=')");
    assert_eq!(json["raw_line"], "icon=");
}

#[test]
fn test_validate_quiet_valid() {
    let output = run(&["--quiet", "validate", path(&fixture_valid("minimal.menu"))]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "quiet mode should produce no stdout");
}

#[test]
fn test_validate_empty_menu_is_success() {
    let output = run(&["validate", "--json", path(&fixture_valid("empty.menu"))]);
    assert!(output.status.success(), "empty menu is not an error");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(json["empty"], true);
}

#[test]
fn test_validate_stdin() {
    let output = run_with_stdin(&["validate"], "item=A\ncmd=a\nicon=\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<stdin>"));
}

#[test]
fn test_validate_stdin_dash() {
    let output = run_with_stdin(&["validate", "-"], "iconsize=4\n");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("illegal size for menu icon"));
}

// ── Show ──────────────────────────────────────────────────

#[test]
fn test_show_tree() {
    let output = run(&["show", path(&fixture_valid("nested.menu"))]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("icon size: 24"));
    assert!(stdout.contains("menu position: 400, 300"));
    assert!(stdout.contains("submenu \"Applications\""));
    assert!(stdout.contains("  item \"Terminal\" => xterm [/usr/share/icons/terminal.png @24px]"));
    assert!(stdout.contains("    item \"Chess\" => xboard"));
}

#[test]
fn test_show_empty_placeholder() {
    let output = run(&["show", path(&fixture_valid("empty.menu"))]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<no content to display>"));
}

#[test]
fn test_show_json() {
    let output = run(&["show", "--json", path(&fixture_valid("nested.menu"))]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(json["item_count"], 4);
    assert_eq!(json["directives"]["icon_size"], 24);
    assert_eq!(json["root"]["children"][0]["label"], "Applications");
    assert_eq!(json["root"]["children"][1]["kind"], "separator");
}

#[test]
fn test_show_invalid_exits_1() {
    let output = run(&["show", path(&fixture_invalid("bad-iconsize.menu"))]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_icon_size_flag_changes_default() {
    let output = run_with_stdin(&["--icon-size", "48", "show"], "item=A\ncmd=a\nicon=a.png\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[a.png @48px]"));
}

#[test]
fn test_icon_size_flag_out_of_range() {
    let output = run(&["--icon-size", "4", "version"]);
    assert!(!output.status.success());
}

// ── Fmt ───────────────────────────────────────────────────

#[test]
fn test_fmt_outputs_canonical() {
    let output = run(&["fmt", path(&fixture_valid("nested.menu"))]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("menupos=400 300\nsubmenu=Applications\n"));
    assert!(stdout.contains("\titem=Editor\n"));
    assert!(!stdout.contains('#'), "comments should be gone");
}

#[test]
fn test_fmt_idempotent() {
    let first = run(&["fmt", path(&fixture_valid("nested.menu"))]);
    assert!(first.status.success());
    let canonical = String::from_utf8_lossy(&first.stdout).to_string();

    let second = run_with_stdin(&["fmt"], &canonical);
    assert!(second.status.success());
    assert_eq!(canonical, String::from_utf8_lossy(&second.stdout));
}

#[test]
fn test_fmt_write_flag() {
    let temp = std::env::temp_dir().join(format!("menudesc_fmt_write_{}.menu", std::process::id()));
    std::fs::write(&temp, "item = A   # first\ncmd = run a\nicon =\n").expect("write temp");

    let output = run(&["fmt", "--write", temp.to_str().unwrap()]);
    assert!(output.status.success(), "fmt --write should exit 0");

    let formatted = std::fs::read_to_string(&temp).expect("read formatted");
    assert_eq!(formatted, "item=A\ncmd=run a\nicon=\n");

    let _ = std::fs::remove_file(&temp);
}

#[test]
fn test_fmt_write_needs_file() {
    let output = run_with_stdin(&["fmt", "--write"], "item=A\ncmd=a\nicon=\n");
    assert_eq!(output.status.code(), Some(2));
}

// ── Hash ──────────────────────────────────────────────────

#[test]
fn test_hash_is_sha256() {
    let output = run(&["hash", path(&fixture_valid("minimal.menu"))]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert_eq!(stdout.len(), 64, "SHA-256 hash should be 64 hex chars");
    assert!(stdout.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_hash_ignores_comments_and_spacing() {
    let plain = run_with_stdin(&["hash"], "item=Hello\ncmd=echo hi\nicon=\n");
    let noisy = run_with_stdin(&["hash"], "# greeting\n\nitem = Hello\ncmd =  echo hi   \nicon=\n");
    assert!(plain.status.success() && noisy.status.success());
    assert_eq!(plain.stdout, noisy.stdout);
}

#[test]
fn test_hash_invalid_exits_1() {
    let output = run(&["hash", path(&fixture_invalid("missing-cmd.menu"))]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}
