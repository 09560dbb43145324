// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PipeError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PipeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.pipeline, raw.stage))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_stages(cfg)?;
    validate_stages(cfg)?;
    Ok(())
}

fn ensure_has_stages(cfg: &RawConfigFile) -> Result<()> {
    if cfg.stage.is_empty() {
        return Err(PipeError::Config(
            "config must contain at least one [[stage]] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_stages(cfg: &RawConfigFile) -> Result<()> {
    for (index, stage) in cfg.stage.iter().enumerate() {
        if stage.program.trim().is_empty() {
            return Err(PipeError::Config(format!(
                "stage {index} has an empty `program`"
            )));
        }
        if let Some(cwd) = &stage.cwd {
            if cwd.as_os_str().is_empty() {
                return Err(PipeError::Config(format!(
                    "stage {index} ('{}') has an empty `cwd`",
                    stage.program
                )));
            }
        }
        if let Some(key) = stage.env.keys().find(|k| k.is_empty() || k.contains('=')) {
            return Err(PipeError::Config(format!(
                "stage {index} ('{}') has an invalid env name {key:?}",
                stage.program
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{PipelineSection, StageConfig};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn raw(stages: Vec<StageConfig>) -> RawConfigFile {
        RawConfigFile {
            pipeline: PipelineSection::default(),
            stage: stages,
        }
    }

    fn stage(program: &str) -> StageConfig {
        StageConfig {
            program: program.into(),
            ..Default::default()
        }
    }

    #[test]
    fn rejects_empty_pipeline() {
        match ConfigFile::try_from(raw(vec![])) {
            Err(PipeError::Config(msg)) => assert!(msg.contains("at least one")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_blank_program() {
        match ConfigFile::try_from(raw(vec![stage("cat"), stage("  ")])) {
            Err(PipeError::Config(msg)) => assert!(msg.contains("stage 1")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_cwd() {
        let mut bad = stage("ls");
        bad.cwd = Some(PathBuf::new());
        assert!(matches!(
            ConfigFile::try_from(raw(vec![bad])),
            Err(PipeError::Config(_))
        ));
    }

    #[test]
    fn rejects_env_name_with_equals() {
        let mut bad = stage("env");
        bad.env = BTreeMap::from([("A=B".to_string(), "x".to_string())]);
        assert!(matches!(
            ConfigFile::try_from(raw(vec![bad])),
            Err(PipeError::Config(_))
        ));
    }

    #[test]
    fn accepts_valid_pipeline() {
        let cfg = ConfigFile::try_from(raw(vec![stage("printf"), stage("wc")])).unwrap();
        assert_eq!(cfg.stages().len(), 2);
        assert!(cfg.pipeline.capture_stderr);
    }
}
