//! Runs the built binary against scripted stdin.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const SUMMARY: &str = "0 contact(s), 0 favourite(s). Unsaved changes are lost.";

fn run_demo(args: &[&str], input: &str) -> Output {
    let dir = TempDir::new().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_menuloop-demo"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("MENULOOP_ATTEMPTS")
        .env_remove("MENULOOP_PROMPT")
        .env_remove("MENULOOP_FAULT_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn exit_runs_finalizer_before_goodbye() {
    let output = run_demo(&[], "x\n");
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    let summary = text.find(SUMMARY).expect("finalizer summary missing");
    let goodbye = text.find("Goodbye!").expect("goodbye missing");
    assert!(summary < goodbye, "summary printed after goodbye:\n{}", text);
}

#[test]
fn return_skips_finalizer() {
    let output = run_demo(&[], "r\n");
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    assert!(!text.contains("contact(s)"), "unexpected summary:\n{}", text);
    assert!(!text.contains("Goodbye!"));
}

#[test]
fn closed_stdin_ends_cleanly() {
    let output = run_demo(&[], "");
    assert_eq!(output.status.code(), Some(0));
    assert!(!stdout(&output).contains("contact(s)"));
}

#[test]
fn crash_is_reported_once() {
    let output = run_demo(&["--log-level", "off"], "!\n\nr\n");
    assert_eq!(output.status.code(), Some(0));

    let errors = stderr(&output);
    assert_eq!(errors.matches("crash test requested").count(), 1, "stderr:\n{}", errors);
    assert!(errors.contains("An error has occurred!"));
    assert!(!errors.contains("panicked at"), "default panic output leaked:\n{}", errors);
}
