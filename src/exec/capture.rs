// src/exec/capture.rs

//! Convenience wrappers over [`exec`] and [`exec_pipeline`].
//!
//! All of them capture stderr into a private buffer and append its text to
//! the returned error, so a failure explains itself without the caller
//! having wired stderr anywhere.

use crate::errors::Result;

use super::pipeline::exec_pipeline;
use super::process::{Input, Output, Process};
use super::single::exec;
use super::stream::CaptureBuffer;

/// [`exec`] with stderr captured into the error message.
pub fn exec_capture_err<P: Process>(
    process: P,
    stdin: Option<Input>,
    stdout: Option<Output>,
) -> Result<()> {
    let stderr = CaptureBuffer::new();
    exec(process, stdin, stdout, Some(Output::Sink(stderr.sink())))
        .map_err(|err| err.with_stderr(&stderr.text()))
}

/// Run one process and return everything it wrote to stdout.
pub fn exec_capture_out<P: Process>(process: P, stdin: Option<Input>) -> Result<Vec<u8>> {
    let stdout = CaptureBuffer::new();
    exec_capture_err(process, stdin, Some(Output::Sink(stdout.sink())))?;
    Ok(stdout.contents())
}

/// Feed `stdin` to one process, discarding its output.
pub fn exec_from_input<P: Process>(process: P, stdin: Input) -> Result<()> {
    exec_capture_err(process, Some(stdin), None)
}

/// Run one process without input, writing its output to `stdout`.
pub fn exec_to_output<P: Process>(process: P, stdout: Output) -> Result<()> {
    exec_capture_err(process, None, Some(stdout))
}

/// [`exec_pipeline`] with every stage's stderr captured into the error.
pub fn exec_pipeline_capture_err<P: Process>(
    stages: impl IntoIterator<Item = P>,
    stdin: Option<Input>,
    stdout: Option<Output>,
) -> Result<()> {
    let stderr = CaptureBuffer::new();
    exec_pipeline(stages, stdin, stdout, Some(Output::Sink(stderr.sink())))
        .map_err(|err| err.with_stderr(&stderr.text()))
}

/// Run a pipeline and return the last stage's output.
///
/// The bytes are returned even when the run fails, holding whatever the
/// last stage managed to write before the pipeline was torn down.
pub fn exec_pipeline_capture_out<P: Process>(
    stages: impl IntoIterator<Item = P>,
    stdin: Option<Input>,
) -> (Vec<u8>, Result<()>) {
    let stdout = CaptureBuffer::new();
    let result = exec_pipeline_capture_err(stages, stdin, Some(Output::Sink(stdout.sink())));
    (stdout.contents(), result)
}
