// src/lib.rs

//! Run external processes, alone or chained stdout-to-stdin like
//! `a | b | c`, without going through a shell.
//!
//! ```no_run
//! use std::process::Command;
//! use pipeworks::exec::{commands, exec_pipeline_capture_out};
//!
//! let mut echo = Command::new("printf");
//! echo.arg("a b c");
//! let mut split = Command::new("tr");
//! split.args([" ", "\n"]);
//! let mut count = Command::new("wc");
//! count.arg("-l");
//!
//! let (out, result) = exec_pipeline_capture_out(commands([echo, split, count]), None);
//! result?;
//! assert_eq!(String::from_utf8_lossy(&out).trim(), "3");
//! # Ok::<(), pipeworks::errors::PipeError>(())
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate};
use crate::exec::{CaptureBuffer, Input, Output, exec_pipeline, exec_pipeline_capture_err};

/// High-level entry point used by `main.rs`.
///
/// Loads the pipeline file, then either prints it (`--dry-run`) or runs it
/// with stdout going to our stdout, buffered when `--capture` is set.
pub fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)
        .with_context(|| format!("loading pipeline from {:?}", args.config))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    info!(pipeline = %cfg.display_pipeline(), "running pipeline");

    let stdin = args.stdin.then_some(Input::Inherit);
    let captured = args.capture.then(CaptureBuffer::new);
    let stdout = match &captured {
        Some(buf) => Output::Sink(buf.sink()),
        None => Output::Inherit,
    };

    let stages = cfg.build_stages();
    if cfg.pipeline.capture_stderr {
        exec_pipeline_capture_err(stages, stdin, Some(stdout))?;
    } else {
        exec_pipeline(stages, stdin, Some(stdout), Some(Output::Inherit))?;
    }

    if let Some(buf) = captured {
        let mut out = io::stdout().lock();
        out.write_all(&buf.contents())?;
        out.flush()?;
    }
    Ok(())
}

/// Print the pipeline and each stage's settings.
fn print_dry_run(cfg: &ConfigFile) {
    println!("pipeworks dry-run");
    println!("  pipeline.capture_stderr = {}", cfg.pipeline.capture_stderr);
    println!("  {}", cfg.display_pipeline());
    println!();

    println!("stages ({}):", cfg.stages().len());
    for (index, stage) in cfg.stages().iter().enumerate() {
        println!("  {index}: {stage}");
        if let Some(cwd) = &stage.cwd {
            println!("      cwd: {}", cwd.display());
        }
        if stage.clear_env {
            println!("      clear_env: true");
        }
        for (key, value) in &stage.env {
            println!("      env: {key}={value}");
        }
    }

    debug!("dry-run complete (no execution)");
}
