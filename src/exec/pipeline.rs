// src/exec/pipeline.rs

//! Pipeline executor: `a | b | c` without a shell.
//!
//! Wiring happens entirely before the first start, so a failing pipe
//! creation never leaves processes behind. Once stages are running, a
//! [`Cleanup`] guard owns the started prefix and kills and reaps all of it
//! whenever the call leaves without having succeeded.

use tracing::{debug, info, warn};

use crate::errors::{PipeError, Result};

use super::process::{Input, Output, Process};

/// Run `stages` as a connected pipeline.
///
/// - `stdin` feeds stage 0 (null device when `None`).
/// - `stdout` receives the last stage's output (discarded when `None`).
/// - `stderr` is shared by every stage (discarded when `None`).
///
/// The first failure is returned: in start order for pipe and start
/// failures, in wait order for exit failures. Every started stage is
/// reaped before returning; on failure all of them are killed first, even
/// ones that already exited successfully.
pub fn exec_pipeline<P: Process>(
    stages: impl IntoIterator<Item = P>,
    stdin: Option<Input>,
    stdout: Option<Output>,
    stderr: Option<Output>,
) -> Result<()> {
    let mut stages: Vec<P> = stages.into_iter().collect();
    if stages.is_empty() {
        return Err(PipeError::NoCommands);
    }

    let stdout = stdout.unwrap_or_default();
    let stderr = stderr.unwrap_or_default();
    let last = stages.len() - 1;

    if let Some(input) = stdin {
        stages[0].set_stdin(input);
    }

    for i in 0..last {
        let (head, tail) = stages.split_at_mut(i + 1);
        let (current, next) = (&mut head[i], &mut tail[0]);
        current.pipe_into(next).map_err(|source| PipeError::Pipe {
            path: current.path().to_string(),
            source,
        })?;
    }

    for stage in &mut stages[..last] {
        let shared = stderr.try_clone().map_err(|source| PipeError::Pipe {
            path: stage.path().to_string(),
            source,
        })?;
        stage.set_stderr(shared);
    }
    stages[last].set_stderr(stderr);
    stages[last].set_stdout(stdout);

    let count = stages.len();
    debug!(stages = count, "pipeline wired");

    let mut run = Cleanup::new(&mut stages);
    run.start_all()?;
    run.wait_all()?;
    run.succeeded();

    info!(stages = count, "pipeline finished successfully");
    Ok(())
}

/// Owns the started prefix of a pipeline for the duration of a run.
///
/// `failed` starts out true and is only cleared once every stage has been
/// waited on successfully, so it is read when the guard drops rather than
/// when a stage was registered. Early returns and panics both count as
/// failure.
struct Cleanup<'a, P: Process> {
    stages: &'a mut [P],
    started: usize,
    failed: bool,
}

impl<'a, P: Process> Cleanup<'a, P> {
    fn new(stages: &'a mut [P]) -> Self {
        Self {
            stages,
            started: 0,
            failed: true,
        }
    }

    fn start_all(&mut self) -> Result<()> {
        for (index, stage) in self.stages.iter_mut().enumerate() {
            if let Err(source) = stage.start() {
                warn!(stage = index, path = %stage.path(), error = %source, "stage failed to start");
                return Err(PipeError::Start {
                    path: stage.path().to_string(),
                    source,
                });
            }
            debug!(stage = index, path = %stage.path(), "stage started");
            self.started += 1;
        }
        Ok(())
    }

    /// Wait for every started stage, keeping only the first failure.
    fn wait_all(&mut self) -> Result<()> {
        let mut first_failure = None;

        for (index, stage) in self.stages[..self.started].iter_mut().enumerate() {
            let path = stage.path().to_string();
            let failure = match stage.wait() {
                Ok(status) if status.success() => {
                    debug!(stage = index, path = %path, "stage exited successfully");
                    continue;
                }
                Ok(status) => {
                    warn!(stage = index, path = %path, %status, "stage failed");
                    PipeError::Exit { path, status }
                }
                Err(source) => {
                    warn!(stage = index, path = %path, error = %source, "waiting for stage failed");
                    PipeError::Wait { path, source }
                }
            };
            first_failure.get_or_insert(failure);
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn succeeded(&mut self) {
        self.failed = false;
    }
}

impl<P: Process> Drop for Cleanup<'_, P> {
    fn drop(&mut self) {
        if !self.failed {
            return;
        }
        for (index, stage) in self.stages[..self.started].iter_mut().enumerate() {
            warn!(stage = index, path = %stage.path(), "killing stage of failed pipeline");
            if let Err(err) = stage.kill() {
                debug!(stage = index, path = %stage.path(), error = %err, "kill failed");
            }
            if let Err(err) = stage.wait() {
                debug!(stage = index, path = %stage.path(), error = %err, "reaping killed stage failed");
            }
        }
    }
}
