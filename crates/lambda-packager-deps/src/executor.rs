use crate::process::{CommandSpec, ProcessError};

/// Abstraction over external process execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
pub trait CommandExecutor {
    /// Run a command to completion and capture its stdout.
    ///
    /// Blocks until the process exits. A non-zero exit is an error carrying
    /// the captured stderr; on success stderr is logged at debug level.
    fn exec(&self, command: &CommandSpec) -> Result<String, ProcessError>;
}

/// Real process executor.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealExecutor;

impl CommandExecutor for RealExecutor {
    fn exec(&self, command: &CommandSpec) -> Result<String, ProcessError> {
        use std::process::{Command, Stdio};

        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &command.current_dir {
            process.current_dir(dir);
        }

        tracing::debug!(command = %command, "running external command");
        let output = process.output().map_err(|e| ProcessError::NotFound {
            program: command.program.clone(),
            source: e,
        })?;

        if output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                tracing::debug!(command = %command, stderr = %stderr.trim(), "command wrote to stderr");
            }
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(ProcessError::CommandFailed {
                command: command.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            })
        }
    }
}
