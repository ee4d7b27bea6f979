#![cfg(unix)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use lambda_packager_deps::{CommandExecutor, CommandSpec, ProcessError, RealExecutor};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn shell(script: &str) -> CommandSpec {
    CommandSpec::new("sh", vec!["-c".to_owned(), script.to_owned()])
}

fn exec_with_logs(command: &CommandSpec) -> (Result<String, ProcessError>, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, || RealExecutor.exec(command));
    let text = String::from_utf8_lossy(&logs.buffer.lock().unwrap()).into_owned();
    (result, text)
}

#[test]
fn successful_command_returns_stdout_and_logs_stderr() {
    let (result, logs) =
        exec_with_logs(&shell("echo installed; echo 'WARNING: target exists' >&2"));

    assert_eq!(result.unwrap(), "installed\n");
    assert!(logs.contains("command wrote to stderr"), "logs: {logs}");
    assert!(logs.contains("WARNING: target exists"), "logs: {logs}");
}

#[test]
fn quiet_command_logs_no_stderr_event() {
    let (result, logs) = exec_with_logs(&shell("echo ok"));

    assert_eq!(result.unwrap(), "ok\n");
    assert!(!logs.contains("command wrote to stderr"), "logs: {logs}");
}

#[test]
fn failing_command_carries_stderr() {
    let (result, _) = exec_with_logs(&shell("echo 'no matching distribution' >&2; exit 1"));

    match result {
        Err(ProcessError::CommandFailed { stderr, .. }) => {
            assert_eq!(stderr, "no matching distribution");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[test]
fn missing_program_is_not_found() {
    let command = CommandSpec::new("definitely-not-a-program-3f9c", Vec::new());
    let (result, _) = exec_with_logs(&command);

    assert!(matches!(result, Err(ProcessError::NotFound { .. })));
}

#[test]
fn runs_in_requested_directory() {
    let tmp = tempfile::TempDir::new().unwrap();
    let command = shell("pwd").in_dir(tmp.path().to_path_buf());
    let (result, _) = exec_with_logs(&command);

    let reported = std::path::PathBuf::from(result.unwrap().trim());
    assert_eq!(
        reported.canonicalize().unwrap(),
        tmp.path().canonicalize().unwrap()
    );
}
