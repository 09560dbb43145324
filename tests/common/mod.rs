#![allow(dead_code)]

use std::process::Command;

use pipeworks::exec::CommandProcess;

/// Build a real process from a program and its arguments.
pub fn cmd(program: &str, args: &[&str]) -> CommandProcess {
    let mut command = Command::new(program);
    command.args(args);
    CommandProcess::new(command)
}

/// `sh -c <script>`, for stages that need redirections or exit codes.
pub fn sh(script: &str) -> CommandProcess {
    cmd("sh", &["-c", script])
}

/// A payload larger than a single OS pipe buffer (64 KiB on Linux).
pub fn multi_page_payload() -> Vec<u8> {
    (0..200_000u32).map(|i| (i % 251) as u8).collect()
}
