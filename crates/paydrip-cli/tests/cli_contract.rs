use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

const EXPECTED_ROOT_HELP: &str = "Paydrip - recurring payout plan scheduler

Usage:
  paydrip <command>

Start here:
  paydrip options --frequency monthly
  paydrip preview --help
  paydrip plan create --help
";

static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

fn unique_test_home() -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(value) => value.as_nanos(),
        Err(_) => 0,
    };
    let sequence = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!(
        "paydrip-cli-test-{}-{stamp}-{sequence}",
        std::process::id()
    ));
    path
}

fn run_cli_in_home(home: &std::path::Path, args: &[&str]) -> (bool, String) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_paydrip"));
    for arg in args {
        command.arg(arg);
    }
    command.env("PAYDRIP_HOME", home);
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let output = command.output();
    assert!(output.is_ok());
    if let Ok(result) = output {
        let stdout = String::from_utf8(result.stdout);
        assert!(stdout.is_ok());
        if let Ok(stdout_text) = stdout {
            return (result.status.success(), stdout_text);
        }
    }

    (false, String::new())
}

fn run_cli(args: &[&str]) -> (bool, String, std::path::PathBuf) {
    let home = unique_test_home();
    let (ok, body) = run_cli_in_home(&home, args);
    (ok, body, home)
}

fn parse_json(body: &str) -> Value {
    let parsed = serde_json::from_str::<Value>(body);
    assert!(parsed.is_ok(), "not JSON: {body}");
    if let Ok(value) = parsed {
        return value;
    }
    Value::Null
}

fn assert_text_error_contract(body: &str, code: &str) {
    assert!(body.contains("That didn't work, but it's fixable."));
    assert!(body.contains(&format!("  Error:    {code}")));
    assert!(body.contains("  Details:"));
    assert!(body.contains("What to do next:"));
}

fn assert_json_error_contract(body: &str, code: &str) -> Value {
    let payload = parse_json(body);
    assert_eq!(payload["error"]["code"], Value::String(code.to_string()));
    assert!(payload["error"]["message"].is_string());
    assert!(payload["error"]["recovery_steps"].is_array());
    payload
}

fn assert_pipe_close_does_not_panic(args: &[&str], expect_success: bool) {
    let home = unique_test_home();
    let mut producer = Command::new(env!("CARGO_BIN_EXE_paydrip"));
    producer.args(args);
    producer.env("PAYDRIP_HOME", &home);
    producer.stdout(Stdio::piped());
    producer.stderr(Stdio::piped());

    let producer_spawn = producer.spawn();
    assert!(producer_spawn.is_ok());
    if let Ok(mut producer_child) = producer_spawn {
        let producer_stdout = producer_child.stdout.take();
        let producer_stderr = producer_child.stderr.take();
        assert!(producer_stdout.is_some());
        assert!(producer_stderr.is_some());

        if let Some(stdout_pipe) = producer_stdout {
            let mut reader = BufReader::new(stdout_pipe);
            let mut first_line = String::new();
            let read_result = reader.read_line(&mut first_line);
            assert!(read_result.is_ok());
            assert!(!first_line.is_empty());
            drop(reader);
        }

        let status = producer_child.wait();
        assert!(status.is_ok());
        if let Ok(exit_status) = status {
            assert_eq!(exit_status.success(), expect_success);
        }

        if let Some(mut stderr_pipe) = producer_stderr {
            let mut stderr_bytes = Vec::new();
            let stderr_read = stderr_pipe.read_to_end(&mut stderr_bytes);
            assert!(stderr_read.is_ok());
            let stderr = String::from_utf8(stderr_bytes);
            assert!(stderr.is_ok());
            if let Ok(stderr_text) = stderr {
                assert!(!stderr_text.contains("Broken pipe"));
                assert!(!stderr_text.contains("failed printing to stdout"));
            }
        }
    }
}

#[test]
fn root_command_uses_short_plaintext_help() {
    let (ok, body, _) = run_cli(&[]);
    assert!(ok);
    assert_eq!(body, EXPECTED_ROOT_HELP);
}

#[test]
fn help_and_version_return_success_output() {
    let (help_ok, help_body, _) = run_cli(&["--help"]);
    assert!(help_ok);
    assert!(help_body.starts_with("Paydrip — recurring payout plan scheduler"));
    assert!(help_body.contains("paydrip plan create --total 1200"));
    assert!(help_body.contains("paydrip plan disburse <plan-id>"));

    let (version_ok, version_body, _) = run_cli(&["--version"]);
    assert!(version_ok);
    assert_eq!(version_body.trim(), "paydrip 0.1.0");
}

#[test]
fn plan_create_help_shows_field_rules() {
    let (ok, body, _) = run_cli(&["plan", "create", "--help"]);
    assert!(ok);
    assert!(body.contains("How plans work:"));
    assert!(body.contains("What to do next:"));
    assert!(body.contains("Field rules (very explicit):"));
    assert!(body.contains("--total (required):"));
    assert!(body.contains("floor(total / payout)"));
    assert!(body.contains("0 = Sunday"));
    assert!(body.contains("Examples:"));
}

#[test]
fn help_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["plan", "create", "--help"], true);
}

#[test]
fn success_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["options", "--frequency", "monthly"], true);
}

#[test]
fn error_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["plan", "create", "--nope"], false);
}

#[test]
fn full_plan_flow_works_end_to_end() {
    let home = unique_test_home();

    let (create_ok, create_body) = run_cli_in_home(
        &home,
        &[
            "plan", "create", "--total", "400", "--frequency", "monthly", "--installments", "4",
            "--start", "2026-02-01", "--as-of", "2026-01-15", "--activate", "--json",
        ],
    );
    assert!(create_ok);
    let create_payload = parse_json(&create_body);
    assert_eq!(create_payload["ok"], Value::Bool(true));
    assert_eq!(create_payload["version"], Value::String("v1".to_string()));
    assert_eq!(
        create_payload["data"]["plan"]["status"],
        Value::String("active".to_string())
    );
    let plan_id = create_payload["data"]["plan"]["plan_id"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    assert!(plan_id.starts_with("plan_"));

    let (disburse_ok, disburse_body) = run_cli_in_home(
        &home,
        &["plan", "disburse", &plan_id, "--as-of", "2026-02-01"],
    );
    assert!(disburse_ok);
    assert!(disburse_body.starts_with("Disbursed installment 1 of 4."));
    assert!(disburse_body.contains("100.00 USD"));
    assert!(disburse_body.contains("Next due:"));

    let (show_ok, show_body) = run_cli_in_home(
        &home,
        &["plan", "show", &plan_id, "--as-of", "2026-02-15", "--json"],
    );
    assert!(show_ok);
    let show_payload = parse_json(&show_body);
    assert_eq!(
        show_payload["data"]["progress"]["amount_disbursed"],
        Value::String("100.00".to_string())
    );
    assert_eq!(
        show_payload["data"]["progress"]["amount_remaining"],
        Value::String("300.00".to_string())
    );
    assert_eq!(
        show_payload["data"]["progress"]["next_due_on"],
        Value::String("2026-03-01".to_string())
    );

    let (list_ok, list_body) = run_cli_in_home(&home, &["plan", "list", "--json"]);
    assert!(list_ok);
    let list_payload = parse_json(&list_body);
    assert!(list_payload.is_array());
    if let Some(rows) = list_payload.as_array() {
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["plan_id"], Value::String(plan_id.clone()));
    }

    let (pause_ok, pause_body) = run_cli_in_home(&home, &["plan", "pause", &plan_id]);
    assert!(pause_ok);
    assert!(pause_body.contains("active -> paused"));

    let (resume_ok, resume_body) = run_cli_in_home(
        &home,
        &["plan", "resume", &plan_id, "--as-of", "2026-02-15"],
    );
    assert!(resume_ok);
    assert!(resume_body.contains("paused -> active"));
    assert!(resume_body.contains("Next payable:"));
}

#[test]
fn plan_list_without_plans_uses_plaintext_guidance() {
    let (ok, body, _) = run_cli(&["plan", "list"]);
    assert!(ok);
    assert!(body.starts_with("No plans yet."));
}

#[test]
fn preview_is_plaintext_and_saves_nothing() {
    let home = unique_test_home();
    let (ok, body) = run_cli_in_home(
        &home,
        &[
            "preview", "--total", "100", "--frequency", "weekly", "--installments", "3",
            "--as-of", "2026-01-15",
        ],
    );
    assert!(ok);
    assert!(body.starts_with("3 installments of 33.33 USD."));
    assert!(body.contains("Final installment:"));
    assert!(body.contains("Nothing is saved yet."));

    let (list_ok, list_body) = run_cli_in_home(&home, &["plan", "list"]);
    assert!(list_ok);
    assert!(list_body.starts_with("No plans yet."));
}

#[test]
fn options_output_lists_presets() {
    let (ok, body, _) = run_cli(&["options", "--frequency", "weekly"]);
    assert!(ok);
    assert!(body.starts_with("Duration presets for `weekly`:"));
    assert!(body.contains("Installments"));
    assert!(body.contains("1 year"));
    assert!(body.contains("installments per month"));
}

#[test]
fn expiring_with_no_matches_names_the_window() {
    let (ok, body, _) = run_cli(&["expiring", "--within", "14"]);
    assert!(ok);
    assert!(body.starts_with("No plans are expiring within 14 days."));
}

#[test]
fn unknown_plan_errors_use_both_contracts() {
    let (text_ok, text_body, _) = run_cli(&["plan", "show", "plan_missing"]);
    assert!(!text_ok);
    assert_text_error_contract(&text_body, "plan_not_found");

    let (json_ok, json_body, _) = run_cli(&["plan", "show", "plan_missing", "--json"]);
    assert!(!json_ok);
    let payload = assert_json_error_contract(&json_body, "plan_not_found");
    assert_eq!(
        payload["error"]["data"]["plan_id"],
        Value::String("plan_missing".to_string())
    );
}

#[test]
fn engine_validation_errors_surface_their_codes() {
    let (ok, body, _) = run_cli(&[
        "plan", "create", "--total", "100", "--frequency", "weekly_specific",
        "--installments", "4", "--json",
    ]);
    assert!(!ok);
    assert_json_error_contract(&body, "invalid_frequency_config");

    let (alloc_ok, alloc_body, _) = run_cli(&[
        "plan", "create", "--total", "100", "--frequency", "weekly",
        "--installments", "4", "--payout-amount", "25", "--json",
    ]);
    assert!(!alloc_ok);
    assert_json_error_contract(&alloc_body, "invalid_allocation");
}

#[test]
fn parse_errors_carry_a_command_hint() {
    let (ok, body, _) = run_cli(&["plan", "create", "--total", "100", "--json"]);
    assert!(!ok);
    let payload = assert_json_error_contract(&body, "invalid_argument");
    assert_eq!(
        payload["error"]["data"]["command_hint"],
        Value::String("plan create".to_string())
    );
}

#[test]
fn bare_plan_shows_help_with_subcommands() {
    let (ok, body, _) = run_cli(&["plan"]);
    assert!(ok);
    assert!(body.contains("create"));
    assert!(body.contains("list"));
    assert!(body.contains("disburse"));
    assert!(body.contains("pause"));
}
