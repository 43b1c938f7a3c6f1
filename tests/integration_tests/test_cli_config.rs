// integration tests for the config command

use crate::common::*;
use std::fs;
use std::path::Path;
use std::process::Output;

/// helper to run formfx config command (text output)
fn run_config(args: &[&str], config_path: &Path) -> Output {
    // use --no-json to get text output (stdout is piped in tests, which auto-enables JSON)
    let mut cmd_args = vec!["--config", config_path.to_str().unwrap(), "--no-json", "config"];
    cmd_args.extend(args);
    run_formfx(&cmd_args)
}

// ============================================================================
// config show / default / path
// ============================================================================

#[test]
fn test_config_show_missing_file_shows_defaults() {
    let test_dir = create_test_dir("config_show_defaults");
    let config_path = test_dir.join("config.json");

    let output = run_config(&["show"], &config_path);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["classes"]["hidden"], "bs-d-none");
    assert_eq!(json["classes"]["disabled"], "bs-ui-disabled");
    assert_eq!(json["evaluation"]["precedence"], "left_to_right");
    assert_eq!(json["capabilities"]["switch"], true);

    // show never creates the file
    assert!(!config_path.exists());

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_show_reads_json5() {
    let test_dir = create_test_dir("config_show_json5");
    let config_path = test_dir.join("config.json");
    fs::write(
        &config_path,
        "{\n  // project classes\n  classes: { hidden: 'd-none' },\n}\n",
    )
    .unwrap();

    let output = run_config(&["show"], &config_path);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["classes"]["hidden"], "d-none");
    assert_eq!(json["classes"]["disabled"], "bs-ui-disabled");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_default_prints_defaults() {
    let output = run_formfx(&["--no-json", "config", "default"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["evaluation"]["unknown_input"], "error");
    assert_eq!(json["capabilities"]["quoted_classnames"], true);
}

#[test]
fn test_config_path_prefers_flag_over_env() {
    let test_dir = create_test_dir("config_path");
    let flag_path = test_dir.join("flag.json");
    let env_path = test_dir.join("env.json");

    let output = run_formfx_with_env(
        &["--config", flag_path.to_str().unwrap(), "--no-json", "config", "path"],
        &[("FORMFX_CONFIG", env_path.to_str().unwrap())],
    );
    assert_eq!(stdout(&output).trim(), flag_path.to_str().unwrap());

    let output = run_formfx_with_env(
        &["--no-json", "config", "path"],
        &[("FORMFX_CONFIG", env_path.to_str().unwrap())],
    );
    assert_eq!(stdout(&output).trim(), env_path.to_str().unwrap());

    cleanup_test_dir(&test_dir);
}

// ============================================================================
// config set / reset
// ============================================================================

#[test]
fn test_config_set_persists_value() {
    let test_dir = create_test_dir("config_set");
    let config_path = test_dir.join("config.json");

    let output = run_config(&["set", "classes.hidden", "is-hidden"], &config_path);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Set classes.hidden = is-hidden"));

    let output = run_config(&["set", "evaluation.precedence", "standard"], &config_path);
    assert!(output.status.success());

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
    assert_eq!(saved["classes"]["hidden"], "is-hidden");
    assert_eq!(saved["evaluation"]["precedence"], "standard");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let test_dir = create_test_dir("config_set_unknown");
    let config_path = test_dir.join("config.json");

    let output = run_config(&["set", "classes.visible", "x"], &config_path);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown config key"));
    assert!(!config_path.exists());

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_reset_writes_defaults() {
    let test_dir = create_test_dir("config_reset");
    let config_path = test_dir.join("config.json");
    fs::write(&config_path, r#"{ "classes": { "hidden": "x" } }"#).unwrap();

    let output = run_config(&["reset"], &config_path);
    assert!(output.status.success());

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
    assert_eq!(saved["classes"]["hidden"], "bs-d-none");

    cleanup_test_dir(&test_dir);
}

// ============================================================================
// config verify
// ============================================================================

#[test]
fn test_config_verify_valid() {
    let test_dir = create_test_dir("config_verify_valid");
    let config_path = test_dir.join("config.json");
    fs::write(&config_path, r#"{ "classes": { "hidden": "hidden" } }"#).unwrap();

    let output = run_config(&["verify"], &config_path);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Configuration is valid"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_verify_reports_errors() {
    let test_dir = create_test_dir("config_verify_errors");
    let config_path = test_dir.join("config.json");
    fs::write(
        &config_path,
        r#"{ "classes": { "hidden": "same", "disabled": "same" } }"#,
    )
    .unwrap();

    let output = run_config(&["verify"], &config_path);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("1 error(s)"));
    assert!(stdout(&output).contains("share the class 'same'"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_verify_missing_file() {
    let test_dir = create_test_dir("config_verify_missing");
    let output = run_config(&["verify"], &test_dir.join("absent.json"));
    assert!(!output.status.success());
    assert!(stderr(&output).contains("config file not found"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_malformed_config_fails_commands() {
    let test_dir = create_test_dir("config_malformed");
    let config_path = test_dir.join("config.json");
    fs::write(&config_path, "{ classes: ").unwrap();

    let output = run_formfx(&[
        "--config",
        config_path.to_str().unwrap(),
        "--no-json",
        "eval",
        "a==1",
        "--value",
        "a=1",
    ]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("Failed to parse config file"));

    cleanup_test_dir(&test_dir);
}
