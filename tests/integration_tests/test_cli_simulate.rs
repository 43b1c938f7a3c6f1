// integration tests for the mount and simulate commands

use crate::common::*;

const FORM: &str = r#"{
    // signup form
    root: { tag: "form", children: [
        { tag: "input", attrs: { name: "role", value: "user" } },
        { tag: "input", attrs: { type: "checkbox", name: "agree" } },
        { tag: "div", attrs: { id: "admin", "data-show": "role==admin" } },
        { tag: "button", attrs: { id: "submit", "data-disable": "agree==false" }, text: "Send" },
        { tag: "span", attrs: { id: "echo", "data-state": "role" } },
        { tag: "button", attrs: { id: "more", "data-switch": "extra", "data-switch-class": "pressed", target: "" } },
        { tag: "div", attrs: { id: "extra", "data-switch": "extra" } },
    ] },
}"#;

#[test]
fn test_mount_prints_initial_state() {
    let test_dir = create_test_dir("mount_text");
    let fixture = write_fixture(&test_dir, FORM);

    let output = run_formfx(&["--no-json", "mount", fixture.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let html = stdout(&output);
    assert!(html.contains(r#"<div class="bs-d-none" data-show="role==admin" id="admin"></div>"#), "{}", html);
    assert!(html.contains(r#"class="bs-ui-disabled""#), "{}", html);
    assert!(html.contains(r#"data-state="role" id="echo">user</span>"#), "{}", html);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_mount_json_reports_listeners() {
    let test_dir = create_test_dir("mount_json");
    let fixture = write_fixture(&test_dir, FORM);

    let output = run_formfx(&["--json", "mount", fixture.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json = json_output(&output);
    // show, disable, state
    assert_eq!(json["result"]["report"]["applied"], 3);
    assert_eq!(json["result"]["report"]["failures"], serde_json::json!([]));
    // role, agree, switch trigger
    assert_eq!(json["result"]["listeners"], 3);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_mount_reports_directive_failures() {
    let test_dir = create_test_dir("mount_failures");
    let fixture = write_fixture(
        &test_dir,
        r#"{ root: { tag: "form", children: [
            { tag: "input", attrs: { name: "role" } },
            { tag: "p", attrs: { "data-show": "role==" } },
            { tag: "p", attrs: { "data-hide": "role==admin" } },
        ] } }"#,
    );

    let output = run_formfx(&["--json", "mount", fixture.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json = json_output(&output);
    let failures = json["result"]["report"]["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["directive"], "data-show");
    assert_eq!(json["result"]["report"]["applied"], 1);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_simulate_replays_steps() {
    let test_dir = create_test_dir("simulate_steps");
    let fixture = write_fixture(&test_dir, FORM);

    let output = run_formfx(&[
        "--json",
        "simulate",
        fixture.to_str().unwrap(),
        "--step",
        "set:role=admin",
        "--step",
        "check:agree",
        "--step",
        "click:more",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json = json_output(&output);
    let steps = json["result"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0]["step"], "set:role=admin");
    // show and state depend on role
    assert_eq!(steps[0]["report"]["applied"], 2);
    assert_eq!(steps[1]["report"]["applied"], 1);
    // the trigger and the panel
    assert_eq!(steps[2]["report"]["applied"], 2);

    let html = json["result"]["html"].as_str().unwrap();
    assert!(html.contains(r#"<div data-show="role==admin" id="admin"></div>"#), "{}", html);
    assert!(html.contains(r#"<div class="bs-d-none" data-switch="extra" id="extra"></div>"#), "{}", html);
    assert!(html.contains(">admin</span>"), "{}", html);
    assert!(html.contains(r#"<button class="pressed""#), "{}", html);
    assert!(!html.contains("bs-ui-disabled"), "{}", html);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_simulate_invalid_step() {
    let test_dir = create_test_dir("simulate_invalid");
    let fixture = write_fixture(&test_dir, FORM);

    let output = run_formfx(&["--no-json", "simulate", fixture.to_str().unwrap(), "--step", "press:enter"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("unknown action 'press'"));

    // a step naming a control that does not exist
    let output = run_formfx(&["--no-json", "simulate", fixture.to_str().unwrap(), "--step", "check:missing"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("no form control named 'missing'"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_simulate_malformed_fixture() {
    let test_dir = create_test_dir("simulate_malformed");
    let fixture = write_fixture(&test_dir, "{ root: ");

    let output = run_formfx(&["--json", "simulate", fixture.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(6));
    assert_eq!(json_output(&output)["error"]["code"], -32006);

    cleanup_test_dir(&test_dir);
}
