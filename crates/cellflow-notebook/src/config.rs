//! Notebook configuration.
//!
//! Loaded from TOML. Every field has a default matching the original
//! notebook, so an empty document is a valid configuration:
//!
//! ```toml
//! seed = 42
//!
//! [data]
//! samples = 100
//! x_start = 0.0
//! x_end = 10.0
//! slope = 3.0
//! noise_std = 3.0
//!
//! [slider]
//! min = 1
//! max = 20
//! step = 1
//! initial = 1
//! label = "Smoothing Window Size"
//! ```

use crate::data::SyntheticParams;
use cellflow::Domain;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotebookConfig {
    /// Seed of the synthetic data generator
    pub seed: u64,
    pub data: SyntheticParams,
    pub slider: SliderConfig,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            data: SyntheticParams::default(),
            slider: SliderConfig::default(),
        }
    }
}

impl NotebookConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::debug!("loaded notebook config from {}", path.display());
        Ok(config)
    }
}

/// The smoothing window slider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SliderConfig {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    /// Value before the first write; the slider starts at `min`
    pub initial: i64,
    pub label: String,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 1,
            max: 20,
            step: 1,
            initial: 1,
            label: "Smoothing Window Size".to_string(),
        }
    }
}

impl SliderConfig {
    pub fn domain(&self) -> Domain {
        Domain::new(self.min, self.max, self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_the_default() {
        assert_eq!(NotebookConfig::from_toml_str("").unwrap(), NotebookConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = NotebookConfig::from_toml_str(
            r#"
            seed = 7

            [slider]
            max = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.slider.max, 30);
        assert_eq!(config.slider.min, 1);
        assert_eq!(config.data, SyntheticParams::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = NotebookConfig::from_toml_str("[slider]\nwidth = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = NotebookConfig::load(Path::new("/nonexistent/cellflow.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cellflow.toml"));
    }
}
