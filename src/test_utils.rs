//! Shared test doubles for the collaborator traits

use crate::error::{ElevateError, Result};
use crate::model::VoiceGender;
use crate::providers::{Coach, CoachContext, VoicePlayer};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Coach that always replies with a fixed string
pub struct ScriptedCoach {
    reply: String,
}

impl ScriptedCoach {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl Coach for ScriptedCoach {
    async fn generate(&self, _user_text: &str, _ctx: &CoachContext<'_>) -> Result<String> {
        Ok(self.reply.clone())
    }
}

/// Coach that always fails
pub struct FailingCoach;

#[async_trait]
impl Coach for FailingCoach {
    async fn generate(&self, _user_text: &str, _ctx: &CoachContext<'_>) -> Result<String> {
        Err(ElevateError::Coach("scripted failure".to_string()).into())
    }
}

/// Voice player that records every playback request
#[derive(Default)]
pub struct RecordingVoice {
    played: Arc<Mutex<Vec<(String, VoiceGender)>>>,
}

impl RecordingVoice {
    /// Handle to the recorded playback log, shared with the player
    pub fn played(&self) -> Arc<Mutex<Vec<(String, VoiceGender)>>> {
        Arc::clone(&self.played)
    }
}

#[async_trait]
impl VoicePlayer for RecordingVoice {
    async fn play(&self, text: &str, voice: VoiceGender) -> Result<()> {
        self.played
            .lock()
            .expect("playback log poisoned")
            .push((text.to_string(), voice));
        Ok(())
    }
}

/// Voice player that always fails
pub struct FailingVoice;

#[async_trait]
impl VoicePlayer for FailingVoice {
    async fn play(&self, _text: &str, _voice: VoiceGender) -> Result<()> {
        Err(ElevateError::Voice("scripted failure".to_string()).into())
    }
}
