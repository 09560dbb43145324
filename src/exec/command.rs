// src/exec/command.rs

//! [`Process`] implementation backed by `std::process::Command`.
//!
//! OS-level destinations (null, inherit, pipe ends) are handed to the child
//! directly. Readers and sinks have no file descriptor, so they are bridged
//! with an OS pipe and a copy thread that `wait` joins before returning.

use std::io::{self, PipeReader, PipeWriter, Read};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{debug, trace};

use super::process::{ExitState, Input, Output, Process};
use super::stream::Sink;

/// A real OS process.
#[derive(Debug)]
pub struct CommandProcess {
    command: Command,
    path: String,
    stdin: Input,
    stdout: Output,
    stderr: Output,
    child: Option<Child>,
    copiers: Vec<JoinHandle<io::Result<()>>>,
}

impl CommandProcess {
    pub fn new(command: Command) -> Self {
        let path = command.get_program().to_string_lossy().into_owned();
        Self {
            command,
            path,
            stdin: Input::Null,
            stdout: Output::Discard,
            stderr: Output::Discard,
            child: None,
            copiers: Vec::new(),
        }
    }

    /// Access the underlying command, e.g. to add arguments before a run.
    pub fn command_mut(&mut self) -> &mut Command {
        &mut self.command
    }

    /// OS process id, once started.
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Drop the stdio handles the command still holds, so pipe ends owned
    /// by the parent close and readers downstream can see EOF.
    fn release_stdio(&mut self) {
        self.command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
    }
}

impl From<Command> for CommandProcess {
    fn from(command: Command) -> Self {
        Self::new(command)
    }
}

/// Wrap a batch of commands, e.g. to build a pipeline.
pub fn commands(commands: impl IntoIterator<Item = Command>) -> Vec<CommandProcess> {
    commands.into_iter().map(CommandProcess::new).collect()
}

/// A stream copy that starts once the child is running.
enum Copier {
    Feed(Box<dyn Read + Send>, PipeWriter),
    Drain(PipeReader, Sink),
}

impl Copier {
    fn spawn(self) -> JoinHandle<io::Result<()>> {
        match self {
            Copier::Feed(mut source, mut writer) => thread::spawn(move || {
                match io::copy(&mut source, &mut writer) {
                    Ok(n) => {
                        trace!(bytes = n, "stdin feeder finished");
                        Ok(())
                    }
                    // The child stopped reading; nothing left to deliver.
                    Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                    Err(err) => Err(err),
                }
            }),
            Copier::Drain(mut reader, mut sink) => thread::spawn(move || {
                let n = io::copy(&mut reader, &mut sink)?;
                trace!(bytes = n, "output drain finished");
                Ok(())
            }),
        }
    }
}

fn input_stdio(input: Input, copiers: &mut Vec<Copier>) -> io::Result<Stdio> {
    Ok(match input {
        Input::Null => Stdio::null(),
        Input::Inherit => Stdio::inherit(),
        Input::Pipe(reader) => Stdio::from(reader),
        Input::Reader(source) => {
            let (reader, writer) = io::pipe()?;
            copiers.push(Copier::Feed(source, writer));
            Stdio::from(reader)
        }
    })
}

fn output_stdio(output: Output, copiers: &mut Vec<Copier>) -> io::Result<Stdio> {
    Ok(match output {
        Output::Discard => Stdio::null(),
        Output::Inherit => Stdio::inherit(),
        Output::Pipe(writer) => Stdio::from(writer),
        Output::Sink(sink) => {
            let (reader, writer) = io::pipe()?;
            copiers.push(Copier::Drain(reader, sink));
            Stdio::from(writer)
        }
    })
}

impl Process for CommandProcess {
    fn path(&self) -> &str {
        &self.path
    }

    fn set_stdin(&mut self, input: Input) {
        self.stdin = input;
    }

    fn set_stdout(&mut self, output: Output) {
        self.stdout = output;
    }

    fn set_stderr(&mut self, output: Output) {
        self.stderr = output;
    }

    fn start(&mut self) -> io::Result<()> {
        if self.child.is_some() {
            return Err(io::Error::other("process already started"));
        }

        let mut copiers = Vec::new();
        let stdin = input_stdio(std::mem::take(&mut self.stdin), &mut copiers)?;
        let stdout = output_stdio(std::mem::take(&mut self.stdout), &mut copiers)?;
        let stderr = output_stdio(std::mem::take(&mut self.stderr), &mut copiers)?;

        let spawned = self
            .command
            .stdin(stdin)
            .stdout(stdout)
            .stderr(stderr)
            .spawn();
        self.release_stdio();
        let child = spawned?;

        debug!(path = %self.path, pid = child.id(), copiers = copiers.len(), "spawned process");
        self.child = Some(child);
        self.copiers = copiers.into_iter().map(Copier::spawn).collect();
        Ok(())
    }

    fn wait(&mut self) -> io::Result<ExitState> {
        let child = self
            .child
            .as_mut()
            .ok_or_else(|| io::Error::other("process not started"))?;
        let state = ExitState::from(child.wait()?);

        let mut copy_error = None;
        for handle in self.copiers.drain(..) {
            let result = handle
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stream copy thread panicked")));
            if let Err(err) = result {
                copy_error.get_or_insert(err);
            }
        }

        // A failed exit is the more useful report; copy errors only surface
        // for otherwise successful runs.
        match copy_error {
            Some(err) if state.success() => Err(err),
            _ => Ok(state),
        }
    }

    fn kill(&mut self) -> io::Result<()> {
        match self.child.as_mut() {
            Some(child) => child.kill(),
            None => Ok(()),
        }
    }
}
