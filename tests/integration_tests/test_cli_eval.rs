// integration tests for the eval and refs commands

use crate::common::*;

#[test]
fn test_eval_text_output() {
    let output = run_formfx(&["--no-json", "eval", "role==admin", "--value", "role=admin"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "true");

    let output = run_formfx(&["--no-json", "eval", "role==admin", "--value", "role=user"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "false");
}

#[test]
fn test_eval_json_output() {
    let output = run_formfx(&[
        "--json",
        "eval",
        "!(role==admin) && agree!=false",
        "--value",
        "role=user",
        "--value",
        "agree=true",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json = json_output(&output);
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["result"]["result"], true);
    assert_eq!(
        json["result"]["references"],
        serde_json::json!(["role", "agree"])
    );
}

#[test]
fn test_eval_piped_output_defaults_to_json() {
    // stdout is a pipe here, so JSON is auto-selected
    let output = run_formfx(&["eval", "a==1", "--value", "a=1"]);
    assert!(output.status.success());
    assert_eq!(json_output(&output)["result"]["result"], true);
}

#[test]
fn test_eval_left_to_right_by_default() {
    let args = [
        "--no-json",
        "eval",
        "a==1 || b==1 && c==1",
        "--value",
        "a=1",
        "--value",
        "b=0",
        "--value",
        "c=0",
    ];

    let output = run_formfx(&args);
    assert_eq!(stdout(&output).trim(), "false");

    let mut standard = args.to_vec();
    standard.extend(["--precedence", "standard"]);
    let output = run_formfx(&standard);
    assert_eq!(stdout(&output).trim(), "true");
}

#[test]
fn test_eval_unknown_input() {
    let output = run_formfx(&["--json", "eval", "rol==admin", "--value", "role=admin"]);
    assert_eq!(output.status.code(), Some(3));

    let json = json_output(&output);
    assert_eq!(json["error"]["code"], -32003);
    assert_eq!(json["error"]["data"]["suggestions"], serde_json::json!(["role"]));

    let output = run_formfx(&["--no-json", "eval", "rol==admin", "--value", "role=admin"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("did you mean: role?"));
}

#[test]
fn test_eval_parse_error() {
    let output = run_formfx(&["--no-json", "eval", "(role==admin", "--value", "role=admin"]);
    assert_eq!(output.status.code(), Some(2));

    let err = stderr(&output);
    assert!(err.contains("unbalanced '('"), "stderr: {}", err);
    assert!(err.contains("at position"), "stderr: {}", err);
}

#[test]
fn test_eval_invalid_value_argument() {
    let output = run_formfx(&["--no-json", "eval", "a==1", "--value", "a"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("expected name=value"));
}

#[test]
fn test_eval_reads_fixture_controls() {
    let test_dir = create_test_dir("eval_fixture");
    let fixture = write_fixture(
        &test_dir,
        r#"{ root: { tag: "form", children: [
            { tag: "input", attrs: { type: "radio", name: "tier", value: "basic" } },
            { tag: "input", attrs: { type: "checkbox", name: "agree", checked: "" } },
        ] } }"#,
    );
    let fixture = fixture.to_str().unwrap();

    let output = run_formfx(&[
        "--no-json",
        "eval",
        "tier==false && agree==true",
        "--fixture",
        fixture,
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "true");

    // explicit values shadow the fixture
    let output = run_formfx(&[
        "--no-json",
        "eval",
        "tier==false",
        "--fixture",
        fixture,
        "--value",
        "tier=basic",
    ]);
    assert_eq!(stdout(&output).trim(), "false");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_missing_fixture() {
    let output = run_formfx(&["--no-json", "eval", "a==1", "--fixture", "/nonexistent/form.json5"]);
    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn test_eval_unknown_input_as_false_from_config() {
    let test_dir = create_test_dir("eval_unknown_false");
    let config_path = test_dir.join("config.json");
    std::fs::write(&config_path, r#"{ "evaluation": { "unknown_input": "false" } }"#).unwrap();

    let output = run_formfx(&[
        "--config",
        config_path.to_str().unwrap(),
        "--no-json",
        "eval",
        "ghost==1",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "false");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_refs_lists_names_in_order() {
    let output = run_formfx(&["--no-json", "refs", "b==1 || (a==2 && !b==3)"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "b\na\n");

    let output = run_formfx(&["--json", "refs", "user==x && username==y"]);
    let json = json_output(&output);
    assert_eq!(
        json["result"]["references"],
        serde_json::json!(["user", "username"])
    );
}
