#![allow(dead_code)]

use std::path::PathBuf;

use pipeworks::config::{ConfigFile, PipelineSection, RawConfigFile, StageConfig};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                pipeline: PipelineSection::default(),
                stage: Vec::new(),
            },
        }
    }

    pub fn with_stage(mut self, stage: StageConfig) -> Self {
        self.config.stage.push(stage);
        self
    }

    pub fn capture_stderr(mut self, val: bool) -> Self {
        self.config.pipeline.capture_stderr = val;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `StageConfig`.
pub struct StageConfigBuilder {
    stage: StageConfig,
}

impl StageConfigBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            stage: StageConfig {
                program: program.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.stage.args.push(arg.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.stage.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn clear_env(mut self, val: bool) -> Self {
        self.stage.clear_env = val;
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stage.cwd = Some(dir.into());
        self
    }

    pub fn build(self) -> StageConfig {
        self.stage
    }
}
