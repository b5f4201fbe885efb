use crate::utils::error::{PlannerError, Result};
use crate::utils::validation;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional TOML config file. Every field falls back to a built-in default
/// when absent, and CLI flags override the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub data_dir: Option<String>,
    pub catalogue_url: Option<String>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PlannerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(url) = &self.catalogue_url {
            validation::validate_url("catalogue_url", url)?;
        }
        if let Some(dir) = &self.data_dir {
            validation::validate_non_empty_string("data_dir", dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_config() {
        let toml_content = r#"
data_dir = "/tmp/planner-data"
catalogue_url = "https://api.example.com/v2/2023-2024"
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_dir.as_deref(), Some("/tmp/planner-data"));
        assert!(config.validate_config().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = FileConfig::from_toml_str("").unwrap();
        assert!(config.data_dir.is_none());
        assert!(config.catalogue_url.is_none());
        assert!(config.validate_config().is_ok());
    }

    #[test]
    fn test_invalid_url_fails_validation() {
        let config = FileConfig::from_toml_str(r#"catalogue_url = "not-a-url""#).unwrap();
        assert!(config.validate_config().is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let err = FileConfig::from_toml_str("data_dir = [").unwrap_err();
        assert!(matches!(err, PlannerError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(br#"data_dir = "./planner-data""#)
            .unwrap();

        let config = FileConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_dir.as_deref(), Some("./planner-data"));
    }
}
