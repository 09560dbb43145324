// src/errors.rs

//! Crate-wide error type.
//!
//! Every failure that involves a stage carries that stage's path, so the
//! rendered message always starts with the program that failed:
//!
//! - `"<path> <os error>"` for pipe / start / wait failures,
//! - `"<path> <exit status>"` for non-zero exits and signals,
//! - `"<above> - <captured stderr>"` once stderr capture is layered on.

use std::io;

use thiserror::Error;

use crate::exec::ExitState;

#[derive(Error, Debug)]
pub enum PipeError {
    /// A pipeline was given zero stages. Nothing was spawned.
    #[error("no commands provided")]
    NoCommands,

    #[error("{path} {source}")]
    Pipe {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path} {source}")]
    Start {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path} {source}")]
    Wait {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path} {status}")]
    Exit { path: String, status: ExitState },

    #[error("{source} - {stderr}")]
    Stderr {
        #[source]
        source: Box<PipeError>,
        stderr: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PipeError {
    /// Path of the stage this error is attributed to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            PipeError::Pipe { path, .. }
            | PipeError::Start { path, .. }
            | PipeError::Wait { path, .. }
            | PipeError::Exit { path, .. } => Some(path),
            PipeError::Stderr { source, .. } => source.path(),
            _ => None,
        }
    }

    /// Exit state of the failing stage, for exit failures.
    pub fn exit_state(&self) -> Option<ExitState> {
        match self {
            PipeError::Exit { status, .. } => Some(*status),
            PipeError::Stderr { source, .. } => source.exit_state(),
            _ => None,
        }
    }

    /// Annotate the error with captured stderr text.
    ///
    /// The text is appended as captured. An empty capture leaves the error
    /// untouched rather than gaining an empty ` - ` suffix.
    pub fn with_stderr(self, stderr: &str) -> PipeError {
        if stderr.is_empty() {
            return self;
        }
        PipeError::Stderr {
            source: Box::new(self),
            stderr: stderr.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipeError>;
