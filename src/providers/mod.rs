//! Collaborator module for Elevate
//!
//! This module contains the coach and voice abstractions and their
//! implementations (Gemini text generation, HTTP speech bridge).

pub mod base;
pub mod gemini;
pub mod voice;

pub use base::{Coach, CoachContext, VoicePlayer};
pub use gemini::GeminiCoach;
pub use voice::{HttpVoice, NullVoice};

use crate::config::Config;
use crate::error::Result;

/// Create a coach instance based on configuration
///
/// # Arguments
///
/// * `config` - Application configuration
///
/// # Returns
///
/// Returns a boxed coach instance
///
/// # Errors
///
/// Returns error if the coach type is invalid or initialization fails
pub fn create_coach(config: &Config) -> Result<Box<dyn Coach>> {
    match config.coach.coach_type.as_str() {
        "gemini" => Ok(Box::new(GeminiCoach::new(config.coach.gemini.clone())?)),
        other => Err(crate::error::ElevateError::Coach(format!(
            "Unknown coach type: {}",
            other
        ))
        .into()),
    }
}

/// Create a voice player based on configuration
///
/// With no endpoint configured the player is a no-op; playback is an
/// optional enhancement, never a requirement.
///
/// # Errors
///
/// Returns error if HTTP client initialization fails
pub fn create_voice(config: &Config) -> Result<Box<dyn VoicePlayer>> {
    match &config.voice.endpoint {
        Some(endpoint) => Ok(Box::new(HttpVoice::new(endpoint.clone())?)),
        None => Ok(Box::new(NullVoice)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoachConfig, Config, GeminiConfig, VoiceConfig};

    #[test]
    fn test_create_coach_default_config() {
        let config = Config::default();
        assert!(create_coach(&config).is_ok());
    }

    #[test]
    fn test_create_coach_invalid_type() {
        let config = Config {
            coach: CoachConfig {
                coach_type: "invalid".to_string(),
                gemini: GeminiConfig::default(),
            },
            voice: VoiceConfig::default(),
        };
        assert!(create_coach(&config).is_err());
    }

    #[test]
    fn test_create_voice_defaults_to_null_player() {
        let config = Config::default();
        assert!(create_voice(&config).is_ok());
    }

    #[test]
    fn test_create_voice_with_endpoint() {
        let config = Config {
            coach: CoachConfig::default(),
            voice: VoiceConfig {
                endpoint: Some("http://localhost:5002/speak".to_string()),
            },
        };
        assert!(create_voice(&config).is_ok());
    }
}
