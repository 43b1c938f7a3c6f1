// shared utilities for integration tests

#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};

use formfx::binding::Page;
use formfx::config::Config;
use formfx::dom::parse_fixture;

// counter for unique test directory names
static TEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// create a fresh temporary directory for one test
pub fn create_test_dir(name: &str) -> PathBuf {
    let count = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = env::temp_dir()
        .join("formfx_integration_tests")
        .join(format!("{}_{}_{}", name, std::process::id(), count));

    // clean up if exists
    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }

    fs::create_dir_all(&dir).expect("Failed to create test directory");
    dir
}

/// clean up a test directory
pub fn cleanup_test_dir(path: &Path) {
    if path.exists() {
        fs::remove_dir_all(path).ok();
    }
}

/// write a fixture file into `dir` and return its path
pub fn write_fixture(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("fixture.json5");
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// path to the built formfx binary
pub fn formfx_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_formfx"))
}

/// run formfx with a config path that does not exist, so defaults apply
pub fn run_formfx(args: &[&str]) -> Output {
    let isolated = env::temp_dir()
        .join("formfx_integration_tests")
        .join("no-such-config.json");
    run_formfx_with_env(args, &[("FORMFX_CONFIG", isolated.to_str().unwrap())])
}

/// run formfx with custom environment
pub fn run_formfx_with_env(args: &[&str], env_vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(formfx_binary_path());
    cmd.args(args).env_remove("RUST_LOG");

    for (key, value) in env_vars {
        cmd.env(key, value);
    }

    cmd.output().expect("Failed to run formfx")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// parse the JSON-RPC envelope printed on stdout
pub fn json_output(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): stdout={}, stderr={}",
            e,
            stdout(output),
            stderr(output)
        )
    })
}

/// build a page from fixture text with the default config
pub fn page(fixture: &str) -> Page {
    page_with_config(fixture, Config::default())
}

pub fn page_with_config(fixture: &str, config: Config) -> Page {
    Page::new(
        parse_fixture(fixture).expect("Failed to parse fixture"),
        config,
    )
}
