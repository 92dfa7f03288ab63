//! Analysis configuration

use pixel_stats::DEFAULT_MAX_DIMENSION;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Long-edge cap applied after decoding, before measuring (`None` keeps full size)
    pub max_analysis_dimension: Option<u32>,
    /// Analyse batch images on the rayon pool
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_analysis_dimension: Some(DEFAULT_MAX_DIMENSION),
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_max_analysis_dimension(mut self, max_dimension: Option<u32>) -> Self {
        self.max_analysis_dimension = max_dimension;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.max_analysis_dimension, Some(1000));
        assert!(config.parallel);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json_str(r#"{ "parallel": false }"#).unwrap();
        assert!(!config.parallel);
        assert_eq!(config.max_analysis_dimension, Some(1000));

        let config = AnalysisConfig::from_json_str(r#"{ "max_analysis_dimension": null }"#).unwrap();
        assert_eq!(config.max_analysis_dimension, None);
    }

    #[test]
    fn test_from_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("screen.json");
        fs::write(&path, r#"{ "max_analysis_dimension": 640 }"#).unwrap();

        let config = AnalysisConfig::from_json_file(&path).unwrap();
        assert_eq!(config.max_analysis_dimension, Some(640));

        assert!(matches!(
            AnalysisConfig::from_json_file(&temp_dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
        assert!(matches!(AnalysisConfig::from_json_str("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_builders() {
        let config = AnalysisConfig::default().sequential().with_max_analysis_dimension(None);
        assert!(!config.parallel);
        assert_eq!(config.max_analysis_dimension, None);
    }
}
