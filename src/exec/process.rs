// src/exec/process.rs

//! The process capability the executors drive.
//!
//! Executors never touch `std::process` directly; they talk to a
//! [`Process`]. Production code uses [`CommandProcess`](super::CommandProcess),
//! tests substitute a fake that records calls and simulates outcomes.

use std::fmt;
use std::io::{self, Cursor, PipeReader, PipeWriter, Read};
use std::process::ExitStatus;

use super::stream::Sink;

/// Where a process reads its standard input from.
#[derive(Default)]
pub enum Input {
    /// The null device.
    #[default]
    Null,
    /// The orchestrating process's own stdin.
    Inherit,
    /// An arbitrary reader, copied into the child by a feeder thread.
    Reader(Box<dyn Read + Send>),
    /// Read end of an inter-stage pipe.
    Pipe(PipeReader),
}

impl Input {
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Input::Reader(Box::new(reader))
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Input::Reader(Box::new(Cursor::new(bytes.into())))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Input::Null => "null",
            Input::Inherit => "inherit",
            Input::Reader(_) => "reader",
            Input::Pipe(_) => "pipe",
        }
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Input::{}", self.kind())
    }
}

/// Where a process writes its standard output or standard error.
#[derive(Default)]
pub enum Output {
    /// Written bytes are dropped.
    #[default]
    Discard,
    /// The orchestrating process's own stream.
    Inherit,
    /// A shared writer, fed by a drain thread.
    Sink(Sink),
    /// Write end of an inter-stage pipe.
    Pipe(PipeWriter),
}

impl Output {
    pub fn sink(writer: impl io::Write + Send + 'static) -> Self {
        Output::Sink(Sink::new(writer))
    }

    /// Duplicate the destination so several stages can share it.
    pub fn try_clone(&self) -> io::Result<Output> {
        Ok(match self {
            Output::Discard => Output::Discard,
            Output::Inherit => Output::Inherit,
            Output::Sink(sink) => Output::Sink(sink.clone()),
            Output::Pipe(writer) => Output::Pipe(writer.try_clone()?),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Output::Discard => "discard",
            Output::Inherit => "inherit",
            Output::Sink(_) => "sink",
            Output::Pipe(_) => "pipe",
        }
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Output::{}", self.kind())
    }
}

/// How a process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    Code(i32),
    Signal(i32),
}

impl ExitState {
    pub fn success(&self) -> bool {
        matches!(self, ExitState::Code(0))
    }
}

impl fmt::Display for ExitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitState::Code(code) => write!(f, "exit status: {code}"),
            ExitState::Signal(signal) => write!(f, "signal: {signal}"),
        }
    }
}

impl From<ExitStatus> for ExitState {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitState::Code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitState::Signal(signal);
            }
        }
        ExitState::Code(-1)
    }
}

/// A program invocation the executors can wire up, start, wait on and kill.
///
/// Stream setters are only called before [`start`](Process::start). After a
/// successful start the executor guarantees that [`wait`](Process::wait) is
/// called at least once, possibly preceded by [`kill`](Process::kill).
pub trait Process {
    /// Identity used in error messages.
    fn path(&self) -> &str;

    fn set_stdin(&mut self, input: Input);
    fn set_stdout(&mut self, output: Output);
    fn set_stderr(&mut self, output: Output);

    /// Connect this process's stdout to `next`'s stdin through an OS pipe.
    fn pipe_into(&mut self, next: &mut Self) -> io::Result<()>
    where
        Self: Sized,
    {
        let (reader, writer) = io::pipe()?;
        self.set_stdout(Output::Pipe(writer));
        next.set_stdin(Input::Pipe(reader));
        Ok(())
    }

    fn start(&mut self) -> io::Result<()>;

    /// Block until the process exits and release its resources.
    ///
    /// Calling it again after the process was reaped returns the same state.
    fn wait(&mut self) -> io::Result<ExitState>;

    /// Send an unconditional kill. A no-op for processes that already exited.
    fn kill(&mut self) -> io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_code_zero_is_success() {
        assert!(ExitState::Code(0).success());
        assert!(!ExitState::Code(1).success());
        assert!(!ExitState::Signal(9).success());
    }

    #[test]
    fn exit_state_display() {
        assert_eq!(ExitState::Code(2).to_string(), "exit status: 2");
        assert_eq!(ExitState::Signal(9).to_string(), "signal: 9");
    }

    #[test]
    fn defaults_are_null_and_discard() {
        assert_eq!(Input::default().kind(), "null");
        assert_eq!(Output::default().kind(), "discard");
    }

    #[test]
    fn pipe_output_can_be_shared() -> io::Result<()> {
        let (_reader, writer) = io::pipe()?;
        let out = Output::Pipe(writer);
        assert_eq!(out.try_clone()?.kind(), "pipe");
        Ok(())
    }
}
