// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

mod common;

use common::{temp_dir, SMALL_SYSTEM};
use std::path::Path;
use std::process::{Command, Output};

fn run_script(dir: &Path, script: &str) -> (Output, serde_json::Value) {
    run_script_with(dir, SMALL_SYSTEM, script, &["--no-uart-stdout"])
}

fn run_script_with(
    dir: &Path,
    system: &str,
    script: &str,
    extra_args: &[&str],
) -> (Output, serde_json::Value) {
    std::fs::write(dir.join("system.yaml"), system).unwrap();
    let script_path = dir.join("script.yaml");
    std::fs::write(&script_path, script).unwrap();
    let output_dir = dir.join("artifacts");

    let output = Command::new(env!("CARGO_BIN_EXE_c3shim"))
        .args([
            "test",
            "--script",
            script_path.to_str().unwrap(),
            "--output-dir",
            output_dir.to_str().unwrap(),
        ])
        .args(extra_args)
        .output()
        .expect("Failed to execute command");

    let result_path = output_dir.join("result.json");
    assert!(result_path.exists(), "no result.json written");
    let content = std::fs::read_to_string(&result_path).unwrap();
    (output, serde_json::from_str(&content).unwrap())
}

const HELLO_SCRIPT: &str = r#"
schema_version: "1.0"
inputs:
  demo: hello
  system: "system.yaml"
limits:
  max_cycles: 5000
assertions:
  - uart_contains: "Hello, world!\n"
"#;

#[test]
fn test_hello_script_passes() {
    let dir = temp_dir("hello");
    let (output, result) = run_script(
        &dir,
        r#"
schema_version: "1.0"
inputs:
  demo: hello
  system: "system.yaml"
limits:
  max_cycles: 100000
assertions:
  - uart_contains: "Hello, world!\n"
  - max_resets: 0
  - expected_stop_reason: max_cycles
"#,
    );

    assert!(output.status.success());
    assert_eq!(result["status"], "pass");
    assert_eq!(result["report"]["stop_reason"], "max_cycles");
    assert_eq!(result["report"]["demo"], "hello");
    assert!(result["uart"].as_str().unwrap().starts_with("Hello, world!\n"));
    assert_eq!(result["config_hash"].as_str().unwrap().len(), 64);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_blink_with_watchdogs_resets() {
    let dir = temp_dir("blink");
    let (output, result) = run_script(
        &dir,
        r#"
schema_version: "1.0"
inputs:
  demo: blink
  system: "system.yaml"
limits:
  max_cycles: 20000
assertions:
  - min_resets: 1
"#,
    );

    assert!(output.status.success());
    let resets = result["report"]["resets"].as_array().unwrap();
    assert!(!resets.is_empty());
    assert_eq!(resets[0]["cause"]["watchdog_timeout"], "timer_group0");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_failed_assertion_exit_code() {
    let dir = temp_dir("fail");
    let (output, result) = run_script(
        &dir,
        r#"
schema_version: "1.0"
inputs:
  demo: blink
  system: "system.yaml"
limits:
  max_cycles: 20000
assertions:
  - max_resets: 0
"#,
    );

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(result["status"], "fail");
    assert_eq!(result["assertions"][0]["passed"], false);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_wall_time_limit() {
    let dir = temp_dir("walltime");
    let (output, result) = run_script(
        &dir,
        r#"
schema_version: "1.0"
inputs:
  demo: blink-no-wdt
  system: "system.yaml"
limits:
  max_cycles: 10000000000
  wall_time_ms: 0
assertions:
  - expected_stop_reason: wall_time
"#,
    );

    assert!(output.status.success());
    assert_eq!(result["report"]["stop_reason"], "wall_time");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_invalid_script_is_config_error() {
    let dir = temp_dir("invalid");
    let script_path = dir.join("script.yaml");
    std::fs::write(
        &script_path,
        r#"
schema_version: "1.0"
inputs:
  demo: blink
limits:
  max_cycles: 0
"#,
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_c3shim"))
        .args(["test", "--script", script_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max_cycles"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_script_respects_uart_echo_off() {
    let dir = temp_dir("echo-off");
    let system = format!("{}uart_echo: false\n", SMALL_SYSTEM);
    let (output, result) = run_script_with(&dir, &system, HELLO_SCRIPT, &[]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    // Output is still captured in the result.
    assert!(result["uart"].as_str().unwrap().starts_with("Hello, world!\n"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_script_uart_echo_on() {
    let dir = temp_dir("echo-on");
    let system = format!("{}uart_echo: true\n", SMALL_SYSTEM);
    let (output, echoed) = run_script_with(&dir, &system, HELLO_SCRIPT, &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Hello, world!\n"));

    // The flag silences stdout but does not change the config hash.
    let (output, quiet) = run_script_with(&dir, &system, HELLO_SCRIPT, &["--no-uart-stdout"]);
    assert!(output.stdout.is_empty());
    assert_eq!(echoed["config_hash"], quiet["config_hash"]);

    let _ = std::fs::remove_dir_all(&dir);
}
