use std::io;
use std::sync::{Arc, Mutex};

use pipeworks::exec::{ExitState, Input, Output, Process};

/// One recorded interaction with a [`FakeProcess`], keyed by its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Stdin(String, &'static str),
    Stdout(String, &'static str),
    Stderr(String, &'static str),
    Pipe(String),
    Start(String),
    Wait(String),
    Kill(String),
}

/// Shared, ordered log of calls made on a set of fake processes.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Paths of processes that were asked to start (including failed attempts).
    pub fn starts(&self) -> Vec<String> {
        self.filter(|c| match c {
            Call::Start(p) => Some(p.clone()),
            _ => None,
        })
    }

    pub fn waits(&self) -> Vec<String> {
        self.filter(|c| match c {
            Call::Wait(p) => Some(p.clone()),
            _ => None,
        })
    }

    pub fn kills(&self) -> Vec<String> {
        self.filter(|c| match c {
            Call::Kill(p) => Some(p.clone()),
            _ => None,
        })
    }

    /// Stream kind last attached as stderr for `path`.
    pub fn stderr_of(&self, path: &str) -> Option<&'static str> {
        self.calls().iter().rev().find_map(|c| match c {
            Call::Stderr(p, kind) if p == path => Some(*kind),
            _ => None,
        })
    }

    pub fn stdin_of(&self, path: &str) -> Option<&'static str> {
        self.calls().iter().rev().find_map(|c| match c {
            Call::Stdin(p, kind) if p == path => Some(*kind),
            _ => None,
        })
    }

    pub fn stdout_of(&self, path: &str) -> Option<&'static str> {
        self.calls().iter().rev().find_map(|c| match c {
            Call::Stdout(p, kind) if p == path => Some(*kind),
            _ => None,
        })
    }

    /// Position of the first call matching `call`, if any.
    pub fn position(&self, call: &Call) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }

    fn filter(&self, f: impl Fn(&Call) -> Option<String>) -> Vec<String> {
        self.calls().iter().filter_map(f).collect()
    }
}

/// A process that never touches the OS.
///
/// It records every call into a shared [`CallLog`] and plays back a
/// configured outcome:
/// - `fail_start` / `fail_pipe` / `fail_wait` make the matching call error,
/// - `exit` sets the state reported by `wait`,
/// - a `kill` before the first `wait` turns the outcome into `Signal(9)`.
#[derive(Debug)]
pub struct FakeProcess {
    path: String,
    log: CallLog,
    exit: ExitState,
    start_error: Option<io::ErrorKind>,
    pipe_error: Option<io::ErrorKind>,
    wait_error: Option<io::ErrorKind>,
    started: bool,
    reaped: Option<ExitState>,
    killed: bool,
}

impl FakeProcess {
    pub fn new(path: &str, log: &CallLog) -> Self {
        Self {
            path: path.to_string(),
            log: log.clone(),
            exit: ExitState::Code(0),
            start_error: None,
            pipe_error: None,
            wait_error: None,
            started: false,
            reaped: None,
            killed: false,
        }
    }

    pub fn exit(mut self, state: ExitState) -> Self {
        self.exit = state;
        self
    }

    pub fn exit_code(self, code: i32) -> Self {
        self.exit(ExitState::Code(code))
    }

    pub fn fail_start(mut self, kind: io::ErrorKind) -> Self {
        self.start_error = Some(kind);
        self
    }

    pub fn fail_pipe(mut self, kind: io::ErrorKind) -> Self {
        self.pipe_error = Some(kind);
        self
    }

    pub fn fail_wait(mut self, kind: io::ErrorKind) -> Self {
        self.wait_error = Some(kind);
        self
    }
}

impl Process for FakeProcess {
    fn path(&self) -> &str {
        &self.path
    }

    fn set_stdin(&mut self, input: Input) {
        self.log.push(Call::Stdin(self.path.clone(), input.kind()));
    }

    fn set_stdout(&mut self, output: Output) {
        self.log.push(Call::Stdout(self.path.clone(), output.kind()));
    }

    fn set_stderr(&mut self, output: Output) {
        self.log.push(Call::Stderr(self.path.clone(), output.kind()));
    }

    fn pipe_into(&mut self, next: &mut Self) -> io::Result<()> {
        self.log.push(Call::Pipe(self.path.clone()));
        if let Some(kind) = self.pipe_error {
            return Err(io::Error::new(kind, "simulated pipe failure"));
        }
        let (reader, writer) = io::pipe()?;
        self.set_stdout(Output::Pipe(writer));
        next.set_stdin(Input::Pipe(reader));
        Ok(())
    }

    fn start(&mut self) -> io::Result<()> {
        self.log.push(Call::Start(self.path.clone()));
        if let Some(kind) = self.start_error {
            return Err(io::Error::new(kind, "simulated start failure"));
        }
        self.started = true;
        Ok(())
    }

    fn wait(&mut self) -> io::Result<ExitState> {
        self.log.push(Call::Wait(self.path.clone()));
        if !self.started {
            return Err(io::Error::other("process not started"));
        }
        if let Some(state) = self.reaped {
            return Ok(state);
        }
        if let Some(kind) = self.wait_error {
            return Err(io::Error::new(kind, "simulated wait failure"));
        }
        let state = if self.killed {
            ExitState::Signal(9)
        } else {
            self.exit
        };
        self.reaped = Some(state);
        Ok(state)
    }

    fn kill(&mut self) -> io::Result<()> {
        self.log.push(Call::Kill(self.path.clone()));
        if self.reaped.is_none() {
            self.killed = true;
        }
        Ok(())
    }
}
