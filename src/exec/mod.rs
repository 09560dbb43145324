// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`process`] defines the [`Process`] capability plus the [`Input`] /
//!   [`Output`] attachments and [`ExitState`].
//! - [`stream`] holds the shared [`Sink`] and the in-memory [`CaptureBuffer`].
//! - [`command`] is the production [`Process`], wrapping
//!   `std::process::Command`.
//! - [`single`] runs one process, [`pipeline`] runs a connected chain.
//! - [`capture`] layers stderr/stdout capturing on top of both.
//!
//! | function                       | stdin    | stdout    | stderr   |
//! |--------------------------------|----------|-----------|----------|
//! | [`exec`]                       | optional | optional  | optional |
//! | [`exec_capture_err`]           | optional | optional  | captured |
//! | [`exec_capture_out`]           | optional | returned  | captured |
//! | [`exec_from_input`]            | required | discarded | captured |
//! | [`exec_to_output`]             | none     | required  | captured |
//! | [`exec_pipeline`]              | optional | optional  | optional |
//! | [`exec_pipeline_capture_err`]  | optional | optional  | captured |
//! | [`exec_pipeline_capture_out`]  | optional | returned  | captured |

pub mod capture;
pub mod command;
pub mod pipeline;
pub mod process;
pub mod single;
pub mod stream;

pub use capture::{
    exec_capture_err, exec_capture_out, exec_from_input, exec_pipeline_capture_err,
    exec_pipeline_capture_out, exec_to_output,
};
pub use command::{CommandProcess, commands};
pub use pipeline::exec_pipeline;
pub use process::{ExitState, Input, Output, Process};
pub use single::exec;
pub use stream::{CaptureBuffer, Sink};
