//! Voice playback implementations for Elevate
//!
//! Two implementations of the VoicePlayer trait: an HTTP bridge that posts
//! text to a local speech-synthesis service, and a no-op player used when no
//! endpoint is configured. Voice is a non-essential enhancement, so callers
//! swallow playback failures either way.

use crate::error::{ElevateError, Result};
use crate::model::VoiceGender;
use crate::providers::VoicePlayer;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// HTTP voice bridge
///
/// Posts `{text, voice}` to a configured speech-synthesis endpoint and
/// ignores the response body. Playback happens on the far side.
pub struct HttpVoice {
    client: Client,
    endpoint: String,
}

/// Request body for the speech bridge
#[derive(Debug, Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

impl HttpVoice {
    /// Create a new HTTP voice player
    ///
    /// # Arguments
    ///
    /// * `endpoint` - URL of the speech-synthesis bridge
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("elevate/0.1.0")
            .build()
            .map_err(|e| ElevateError::Voice(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = endpoint.into();
        tracing::info!("Initialized voice bridge: endpoint={}", endpoint);

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl VoicePlayer for HttpVoice {
    async fn play(&self, text: &str, voice: VoiceGender) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SpeakRequest {
                text,
                voice: voice.as_str(),
            })
            .send()
            .await
            .map_err(|e| ElevateError::Voice(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(
                ElevateError::Voice(format!("Bridge returned {}", response.status())).into(),
            );
        }

        Ok(())
    }
}

/// Disabled voice playback
///
/// Used when no endpoint is configured; every request succeeds silently.
pub struct NullVoice;

#[async_trait]
impl VoicePlayer for NullVoice {
    async fn play(&self, _text: &str, _voice: VoiceGender) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_null_voice_always_succeeds() {
        let voice = NullVoice;
        assert!(voice.play("hello", VoiceGender::Female).await.is_ok());
    }

    #[tokio::test]
    async fn test_http_voice_posts_text_and_voice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({
                "text": "Great job!",
                "voice": "male"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let voice = HttpVoice::new(server.uri()).expect("new failed");
        voice
            .play("Great job!", VoiceGender::Male)
            .await
            .expect("play failed");
    }

    #[tokio::test]
    async fn test_http_voice_errors_on_bridge_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let voice = HttpVoice::new(server.uri()).expect("new failed");
        assert!(voice.play("hello", VoiceGender::Female).await.is_err());
    }
}
