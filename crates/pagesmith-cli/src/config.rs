//! Configuration management for the CLI.

use crate::cli::Overrides;
use crate::error::{CliError, Result};
use pagesmith_designer::DesignerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Pipeline configuration
    #[serde(default)]
    pub designer: DesignerConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Could not find config directory".into()))?;
        Ok(base.join("pagesmith").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist; the default path falls back to built-in
    /// defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply flag and environment overrides, then validate.
    ///
    /// A preset is applied first, so individual bounds still win over it.
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> Result<()> {
        if let Some(preset) = overrides.preset {
            self.designer = std::mem::take(&mut self.designer).with_preset(preset.into());
        }

        let designer = &mut self.designer;

        if let Some(key) = overrides.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            designer.endpoint.api_key = Some(key.clone());
        }
        if let Some(url) = &overrides.base_url {
            designer.endpoint.base_url = url.clone();
        }
        if let Some(model) = &overrides.model {
            designer.endpoint.model = model.clone();
        }
        if let Some(min) = overrides.min_blocks {
            designer.validation.min_blocks = min;
        }
        if let Some(max) = overrides.max_blocks {
            designer.validation.max_blocks = max;
        }
        if let Some(len) = overrides.max_content_len {
            designer.validation.max_content_len = len;
        }
        if let Some(layout) = &overrides.default_layout {
            designer.layout_hint_default = layout.clone();
        }

        designer.validate().map_err(CliError::Config)
    }

    /// The configured API key, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.designer
            .endpoint
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliPreset;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.designer.layout_hint_default, "grid-2-2");
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.settings.format = OutputFormat::Json;
        config.designer.validation.max_blocks = 5;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.settings.format, OutputFormat::Json);
        assert_eq!(loaded.designer.validation.max_blocks, 5);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[designer.validation]\nmax_content_len = 80\n").unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.designer.validation.max_content_len, 80);
        assert!(loaded.settings.color);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/pagesmith.toml")));
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = Config::default();
        let overrides = Overrides {
            api_key: Some("sk-test".to_string()),
            model: Some("other-model".to_string()),
            min_blocks: Some(2),
            max_blocks: Some(4),
            default_layout: Some("list".to_string()),
            ..Overrides::default()
        };

        config.apply_overrides(&overrides).unwrap();

        assert_eq!(config.api_key(), Some("sk-test"));
        assert_eq!(config.designer.endpoint.model, "other-model");
        assert_eq!(config.designer.validation.min_blocks, 2);
        assert_eq!(config.designer.validation.max_blocks, 4);
        assert_eq!(config.designer.layout_hint_default, "list");
    }

    #[test]
    fn test_preset_then_individual_overrides() {
        let mut config = Config::default();
        config.designer.endpoint.model = "file-model".to_string();
        let overrides = Overrides {
            preset: Some(CliPreset::Detailed),
            max_blocks: Some(5),
            ..Overrides::default()
        };

        config.apply_overrides(&overrides).unwrap();

        assert_eq!(config.designer.validation.max_content_len, 150);
        assert_eq!(config.designer.validation.max_blocks, 5);
        assert_eq!(config.designer.endpoint.model, "file-model");
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let mut config = Config::default();
        let overrides = Overrides {
            api_key: Some("   ".to_string()),
            ..Overrides::default()
        };
        config.apply_overrides(&overrides).unwrap();
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let mut config = Config::default();
        let overrides = Overrides {
            min_blocks: Some(9),
            ..Overrides::default()
        };
        assert!(matches!(
            config.apply_overrides(&overrides),
            Err(CliError::Config(_))
        ));
    }
}
