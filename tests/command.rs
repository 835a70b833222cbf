#![cfg(unix)]

mod support;

use strainbank::command::{CommandSpec, capture_command, run_command};

#[test]
fn successful_command_returns_true() {
    assert!(run_command("true", false));
    assert!(run_command(CommandSpec::argv(["sh", "-c", "exit 0"]), false));
}

#[test]
fn failing_command_warns() {
    let (ok, logs) = support::with_captured_logs(|| run_command("echo boom >&2; exit 1", false));
    assert!(!ok);
    assert!(logs.contains("WARN"));
    assert!(logs.contains("command failed"));
    assert!(logs.contains("boom"));
}

#[test]
fn ignored_failure_is_silent() {
    let (ok, logs) = support::with_captured_logs(|| run_command("exit 1", true));
    assert!(!ok);
    assert!(!logs.contains("WARN"));
}

#[test]
fn missing_program_is_a_failure() {
    let spec = CommandSpec::argv(["strainbank-no-such-program-xyz"]);
    let (ok, logs) = support::with_captured_logs(|| run_command(spec, false));
    assert!(!ok);
    assert!(logs.contains("could not be started"));
}

#[test]
fn shell_interprets_pipes() {
    let output = capture_command(&CommandSpec::shell("printf 'a\\nb\\n' | wc -l")).unwrap();
    assert!(output.success());
    assert_eq!(output.stdout.trim(), "2");
}

#[test]
fn captured_output_serializes_as_json() {
    let output = capture_command(&CommandSpec::shell("echo GCF_000005845; exit 4")).unwrap();
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["code"], 4);
    assert_eq!(json["stdout"], "GCF_000005845\n");
    assert_eq!(json["stderr"], "");
}
