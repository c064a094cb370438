//! Configuration for the page designer

use crate::style::StyleGuide;
use pagesmith_gatekeeper::ValidationConfig;
use pagesmith_llm::chat::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use pagesmith_llm::RetryPolicy;
use serde::{Deserialize, Serialize};

/// How the JSON object is located inside a model reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// First `{` to last `}`
    #[default]
    Greedy,
    /// First complete top-level object, string-aware
    Balanced,
}

/// Named sizing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// At most four short blocks
    Concise,
    /// Longer blocks and a larger completion budget
    Detailed,
}

/// Completion endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Credential; without one the designer runs offline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Sampling temperature
    pub temperature: f32,

    /// Reply token limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: 0.1,
            max_tokens: None,
        }
    }
}

/// Heuristic fallback settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Title cap for blocks cut from the raw text
    pub title_max_len: usize,

    /// Maximum number of segments turned into blocks
    pub max_segments: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            title_max_len: 8,
            max_segments: 4,
        }
    }
}

/// Configuration for the page designer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    /// Layout hint when neither caller nor model supply one
    pub layout_hint_default: String,

    /// JSON location strategy
    pub scan_mode: ScanMode,

    /// Record bounds
    pub validation: ValidationConfig,

    /// Completion retries
    pub retry: RetryPolicy,

    /// Completion endpoint
    pub endpoint: EndpointConfig,

    /// Heuristic fallback
    pub fallback: FallbackConfig,

    /// Tone, rules and glossary injected into the system prompt
    pub style: StyleGuide,
}

impl Default for DesignerConfig {
    /// Default configuration: 3–6 blocks, 50-character content
    fn default() -> Self {
        Self {
            layout_hint_default: "grid-2-2".to_string(),
            scan_mode: ScanMode::Greedy,
            validation: ValidationConfig::default(),
            retry: RetryPolicy::default(),
            endpoint: EndpointConfig::default(),
            fallback: FallbackConfig::default(),
            style: StyleGuide::default(),
        }
    }
}

impl DesignerConfig {
    /// Concise preset: 3 to 4 blocks, 10-character titles, 50-character content
    pub fn concise() -> Self {
        Self::default().with_preset(Preset::Concise)
    }

    /// Detailed preset: 150-character content and a longer attempt budget
    pub fn detailed() -> Self {
        Self::default().with_preset(Preset::Detailed)
    }

    /// Apply a preset's sizing
    ///
    /// Block bounds, title and content caps, the attempt timeout and the
    /// token budget are replaced; endpoint identity, retry counts, the title
    /// pool and the style guide are kept.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        let (min_blocks, max_blocks, title_max_len, max_content_len, attempt_timeout_ms, max_tokens) =
            match preset {
                Preset::Concise => (3, 4, 10, 50, 60_000, 1024),
                Preset::Detailed => (3, 6, 15, 150, 120_000, 2048),
            };
        self.validation.min_blocks = min_blocks;
        self.validation.max_blocks = max_blocks;
        self.validation.title_max_len = title_max_len;
        self.validation.max_content_len = max_content_len;
        self.retry.attempt_timeout_ms = attempt_timeout_ms;
        self.endpoint.max_tokens = Some(max_tokens);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.validation.validate().map_err(|e| e.to_string())?;
        self.retry.validate()?;
        if self.layout_hint_default.trim().is_empty() {
            return Err("layout_hint_default must not be empty".to_string());
        }
        if self.endpoint.base_url.trim().is_empty() {
            return Err("endpoint.base_url must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.endpoint.temperature) {
            return Err("endpoint.temperature must be between 0.0 and 2.0".to_string());
        }
        if self.fallback.title_max_len == 0 {
            return Err("fallback.title_max_len must be greater than 0".to_string());
        }
        if self.fallback.max_segments == 0 {
            return Err("fallback.max_segments must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DesignerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.layout_hint_default, "grid-2-2");
        assert_eq!(config.endpoint.model, "glm-4.5-flash");
        assert_eq!(config.scan_mode, ScanMode::Greedy);
    }

    #[test]
    fn test_presets_are_valid() {
        let concise = DesignerConfig::concise();
        assert!(concise.validate().is_ok());
        assert_ne!(concise, DesignerConfig::default());
        assert_eq!(concise.validation.max_blocks, 4);
        assert_eq!(concise.validation.max_content_len, 50);

        let detailed = DesignerConfig::detailed();
        assert!(detailed.validate().is_ok());
        assert_eq!(detailed.validation.max_content_len, 150);
        assert_eq!(detailed.endpoint.max_tokens, Some(2048));
    }

    #[test]
    fn test_preset_keeps_endpoint_identity() {
        let mut config = DesignerConfig::default();
        config.endpoint.model = "custom-model".to_string();
        config.retry.max_attempts = 5;

        let config = config.with_preset(Preset::Detailed);

        assert_eq!(config.endpoint.model, "custom-model");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.attempt_timeout_ms, 120_000);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let mut config = DesignerConfig::default();
        config.validation.min_blocks = 7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_layout_rejected() {
        let mut config = DesignerConfig::default();
        config.layout_hint_default = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config = DesignerConfig::from_toml(
            r#"
            scan_mode = "balanced"

            [validation]
            max_blocks = 5

            [retry]
            max_attempts = 2
            base_delay_ms = 100
            multiplier = 1.5
            attempt_timeout_ms = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.scan_mode, ScanMode::Balanced);
        assert_eq!(config.validation.max_blocks, 5);
        assert_eq!(config.validation.min_blocks, 3);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.layout_hint_default, "grid-2-2");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = DesignerConfig::detailed();
        let toml_str = config.to_toml().unwrap();
        let parsed = DesignerConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_api_key_not_serialized_when_absent() {
        let toml_str = DesignerConfig::default().to_toml().unwrap();
        assert!(!toml_str.contains("api_key"));
    }
}
