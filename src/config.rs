//! Configuration management for Elevate
//!
//! This module handles loading, parsing, and validating configuration from
//! a YAML file, with sensible defaults for every field so the app runs with
//! no config file at all.

use crate::error::{ElevateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Elevate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Coach collaborator configuration
    #[serde(default)]
    pub coach: CoachConfig,

    /// Voice playback collaborator configuration
    #[serde(default)]
    pub voice: VoiceConfig,
}

/// Coach collaborator configuration
///
/// Specifies which text-generation backend to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    /// Type of coach backend to use ("gemini")
    #[serde(rename = "type", default = "default_coach_type")]
    pub coach_type: String,

    /// Gemini backend configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_coach_type() -> String {
    "gemini".to_string()
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            coach_type: default_coach_type(),
            gemini: GeminiConfig::default(),
        }
    }
}

/// Gemini coach backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use for coaching replies
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API key; falls back to the `GEMINI_API_KEY` environment variable
    #[serde(default)]
    pub api_key: Option<String>,

    /// Optional API base URL override
    ///
    /// When set, this base is used to build the `generateContent` endpoint,
    /// which allows tests to point the coach at a mock server.
    #[serde(default)]
    pub api_base: Option<String>,
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_key: None,
            api_base: None,
        }
    }
}

impl GeminiConfig {
    /// Resolve the API key from config or environment
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
    }
}

/// Voice playback collaborator configuration
///
/// Voice is an optional enhancement; when no endpoint is configured the
/// player is a no-op and every playback request silently succeeds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Speech-synthesis bridge endpoint; `None` disables playback
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// A missing file yields the default configuration rather than an error;
    /// the app is fully usable without one.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ElevateError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Config = serde_yaml::from_str(&contents)
            .map_err(|e| ElevateError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ElevateError::Config` for an unknown coach type
    pub fn validate(&self) -> Result<()> {
        match self.coach.coach_type.as_str() {
            "gemini" => Ok(()),
            other => {
                Err(ElevateError::Config(format!("Unknown coach type: {}", other)).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.coach.coach_type, "gemini");
        assert_eq!(config.coach.gemini.model, "gemini-2.0-flash");
        assert!(config.voice.endpoint.is_none());
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let config = Config::load("/nonexistent/elevate.yaml").expect("load failed");
        assert_eq!(config.coach.coach_type, "gemini");
    }

    #[test]
    fn test_load_parses_yaml() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile failed");
        writeln!(
            file,
            "coach:\n  type: gemini\n  gemini:\n    model: gemini-1.5-pro\nvoice:\n  endpoint: http://localhost:5002/speak"
        )
        .expect("write failed");

        let config = Config::load(file.path()).expect("load failed");
        assert_eq!(config.coach.gemini.model, "gemini-1.5-pro");
        assert_eq!(
            config.voice.endpoint.as_deref(),
            Some("http://localhost:5002/speak")
        );
    }

    #[test]
    fn test_validate_rejects_unknown_coach_type() {
        let config = Config {
            coach: CoachConfig {
                coach_type: "clippy".to_string(),
                gemini: GeminiConfig::default(),
            },
            voice: VoiceConfig::default(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_malformed_yaml() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile failed");
        writeln!(file, "coach: [not: a map").expect("write failed");
        assert!(Config::load(file.path()).is_err());
    }
}
