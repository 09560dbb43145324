// src/config/model.rs

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use serde::Deserialize;

use crate::exec::CommandProcess;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [pipeline]
/// capture_stderr = true
///
/// [[stage]]
/// program = "printf"
/// args = ["a b c"]
///
/// [[stage]]
/// program = "tr"
/// args = [" ", "\n"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub pipeline: PipelineSection,

    /// Stages in pipeline order, from `[[stage]]` tables.
    #[serde(default)]
    pub stage: Vec<StageConfig>,
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSection {
    /// Capture every stage's stderr and append it to the error on failure.
    /// When `false`, stderr goes straight to the terminal.
    #[serde(default = "default_capture_stderr")]
    pub capture_stderr: bool,
}

fn default_capture_stderr() -> bool {
    true
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            capture_stderr: default_capture_stderr(),
        }
    }
}

/// One `[[stage]]` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StageConfig {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment variables.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Start from an empty environment instead of inheriting ours.
    #[serde(default)]
    pub clear_env: bool,

    #[serde(default)]
    pub cwd: Option<PathBuf>,
}

impl StageConfig {
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if self.clear_env {
            cmd.env_clear();
        }
        cmd.envs(&self.env);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

impl fmt::Display for StageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '\'') {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// A validated pipeline description. Build one via `ConfigFile::try_from`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub pipeline: PipelineSection,
    stages: Vec<StageConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(pipeline: PipelineSection, stages: Vec<StageConfig>) -> Self {
        Self { pipeline, stages }
    }

    pub fn stages(&self) -> &[StageConfig] {
        &self.stages
    }

    /// Build fresh, unstarted processes for every stage.
    pub fn build_stages(&self) -> Vec<CommandProcess> {
        self.stages
            .iter()
            .map(|stage| CommandProcess::new(stage.to_command()))
            .collect()
    }

    /// Shell-like rendering, e.g. `printf "a b c" | tr " " "\n" | wc -l`.
    pub fn display_pipeline(&self) -> String {
        self.stages
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
