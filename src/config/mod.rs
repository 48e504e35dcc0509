use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::PlanConfig;

/// Which duration probe the splitter uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeBackend {
    #[default]
    Ffprobe,
    Native,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root under which each source gets its own segment directory
    pub output_dir: PathBuf,
    pub plan: PlanConfig,
    /// Remove the source file after all of its segments were written
    pub delete_original: bool,
    pub ffmpeg: String,
    pub ffprobe: String,
    pub probe: ProbeBackend,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("downloads"),
            plan: PlanConfig::default(),
            delete_original: false,
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            probe: ProbeBackend::Ffprobe,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Defaults, or the contents of a JSON config file when one is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {:?}", path))?;
                Self::from_json(&raw)
                    .with_context(|| format!("failed to parse config file {:?}", path))?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(raw)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.plan.validate().context("invalid segment bounds")?;
        anyhow::ensure!(!self.ffmpeg.trim().is_empty(), "ffmpeg binary must not be empty");
        anyhow::ensure!(
            !self.ffprobe.trim().is_empty(),
            "ffprobe binary must not be empty"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ProbeBackend};
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::load(None).unwrap();
        assert!(config.output_dir.ends_with("downloads"));
        assert_eq!(config.plan.max_segment, 110);
        assert_eq!(config.probe, ProbeBackend::Ffprobe);
        assert!(!config.delete_original);
        config.validate().unwrap();
    }

    #[test]
    fn loads_partial_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"output_dir": "cuts", "plan": {{"min_last_segment": 59}}, "probe": "native", "delete_original": true}}"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert!(config.output_dir.ends_with("cuts"));
        assert_eq!(config.plan.min_segment, 95);
        assert_eq!(config.plan.min_last_segment, 59.0);
        assert_eq!(config.probe, ProbeBackend::Native);
        assert!(config.delete_original);
        assert_eq!(config.ffmpeg, "ffmpeg");
    }

    #[test]
    fn rejects_inverted_bounds() {
        let config = AppConfig::from_json(r#"{"plan": {"min_segment": 120}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load(Some(std::path::Path::new("/nonexistent/vidsplit.json")))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("vidsplit.json"));
    }
}
