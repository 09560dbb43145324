// tests/single_fake_process.rs

use std::error::Error;
use std::io;

use pipeworks::errors::PipeError;
use pipeworks::exec::{
    ExitState, Input, Output, exec, exec_capture_err, exec_capture_out, exec_from_input,
    exec_to_output,
};
use pipeworks_test_utils::fake_process::{CallLog, FakeProcess};
use pipeworks_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn exec_defaults_streams_to_discard() -> TestResult {
    init_tracing();
    let log = CallLog::new();

    exec(FakeProcess::new("tool", &log), None, None, None)?;

    assert_eq!(log.stdin_of("tool"), None);
    assert_eq!(log.stdout_of("tool"), Some("discard"));
    assert_eq!(log.stderr_of("tool"), Some("discard"));
    assert_eq!(log.starts(), vec!["tool"]);
    assert_eq!(log.waits(), vec!["tool"]);
    Ok(())
}

#[test]
fn exec_start_failure_is_tagged_and_not_waited() {
    init_tracing();
    let log = CallLog::new();
    let process = FakeProcess::new("/opt/missing", &log).fail_start(io::ErrorKind::NotFound);

    let err = exec(process, None, None, None).unwrap_err();

    assert!(matches!(err, PipeError::Start { .. }));
    assert!(err.to_string().starts_with("/opt/missing "));
    assert!(log.waits().is_empty());
    assert!(log.kills().is_empty());
}

#[test]
fn exec_signal_termination_is_a_failure() {
    init_tracing();
    let log = CallLog::new();
    let process = FakeProcess::new("victim", &log).exit(ExitState::Signal(9));

    let err = exec(process, None, None, None).unwrap_err();

    assert_eq!(err.to_string(), "victim signal: 9");
}

#[test]
fn exec_wait_error_is_tagged() {
    init_tracing();
    let log = CallLog::new();
    let process = FakeProcess::new("flaky", &log).fail_wait(io::ErrorKind::Other);

    let err = exec(process, None, None, None).unwrap_err();

    assert!(matches!(err, PipeError::Wait { .. }));
    assert_eq!(err.path(), Some("flaky"));
    // The process is still owned by the call, so it is killed and reaped.
    assert_eq!(log.kills(), vec!["flaky"]);
    assert_eq!(log.waits(), vec!["flaky", "flaky"]);
}

#[test]
fn wrappers_attach_the_expected_streams() -> TestResult {
    init_tracing();
    let log = CallLog::new();

    exec_capture_err(FakeProcess::new("e", &log), None, None)?;
    exec_capture_out(FakeProcess::new("o", &log), None)?;
    exec_from_input(FakeProcess::new("i", &log), Input::bytes("data"))?;
    exec_to_output(FakeProcess::new("w", &log), Output::sink(io::sink()))?;

    assert_eq!(log.stderr_of("e"), Some("sink"));
    assert_eq!(log.stdout_of("e"), Some("discard"));

    assert_eq!(log.stdout_of("o"), Some("sink"));
    assert_eq!(log.stderr_of("o"), Some("sink"));

    assert_eq!(log.stdin_of("i"), Some("reader"));
    assert_eq!(log.stdout_of("i"), Some("discard"));
    assert_eq!(log.stderr_of("i"), Some("sink"));

    assert_eq!(log.stdin_of("w"), None);
    assert_eq!(log.stdout_of("w"), Some("sink"));
    Ok(())
}

#[test]
fn capture_out_returns_nothing_on_failure() {
    init_tracing();
    let log = CallLog::new();

    let result = exec_capture_out(FakeProcess::new("bad", &log).exit_code(1), None);

    match result {
        Err(PipeError::Exit { path, .. }) => assert_eq!(path, "bad"),
        other => panic!("expected Exit, got {other:?}"),
    }
}
