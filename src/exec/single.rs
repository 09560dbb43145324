// src/exec/single.rs

//! Single-process executor.

use tracing::{debug, warn};

use crate::errors::{PipeError, Result};

use super::process::{Input, Output, Process};

/// Run one process to completion.
///
/// `stdin` defaults to the null device; `stdout` and `stderr` default to
/// [`Output::Discard`]. Start and exit failures are tagged with the
/// process's path.
pub fn exec<P: Process>(
    mut process: P,
    stdin: Option<Input>,
    stdout: Option<Output>,
    stderr: Option<Output>,
) -> Result<()> {
    if let Some(input) = stdin {
        process.set_stdin(input);
    }
    process.set_stdout(stdout.unwrap_or_default());
    process.set_stderr(stderr.unwrap_or_default());

    let path = process.path().to_string();
    debug!(path = %path, "starting process");

    process.start().map_err(|source| {
        warn!(path = %path, error = %source, "process failed to start");
        PipeError::Start {
            path: path.clone(),
            source,
        }
    })?;

    match process.wait() {
        Ok(status) if status.success() => {
            debug!(path = %path, "process exited successfully");
            Ok(())
        }
        Ok(status) => {
            warn!(path = %path, %status, "process failed");
            Err(PipeError::Exit { path, status })
        }
        Err(source) => {
            warn!(path = %path, error = %source, "waiting for process failed; killing it");
            if let Err(err) = process.kill() {
                debug!(path = %path, error = %err, "kill failed");
            }
            if let Err(err) = process.wait() {
                debug!(path = %path, error = %err, "reaping killed process failed");
            }
            Err(PipeError::Wait { path, source })
        }
    }
}
