//! Collaborator traits for Elevate
//!
//! This module defines the two external collaborators the core depends on
//! but does not implement: a text-generation coach and a voice player.
//! Both are async trait objects so the orchestrator can be tested against
//! scripted fakes.

use crate::error::Result;
use crate::model::{HistoryLog, Task, VoiceGender};
use async_trait::async_trait;

/// Context handed to the coach alongside the user's message
///
/// The full task list and history let the backend ground its replies in the
/// user's actual progress; the voice preference is a tone hint only and is
/// never interpreted by the orchestrator itself.
#[derive(Debug, Clone, Copy)]
pub struct CoachContext<'a> {
    /// Current active task list
    pub tasks: &'a [Task],
    /// Archived day logs, most recent first
    pub history: &'a [HistoryLog],
    /// Voice-gender preference, used by the backend to tailor tone
    pub voice: VoiceGender,
}

/// Text-generation collaborator
///
/// May fail; failure must never crash the orchestrator, which converts it
/// into a fallback transcript entry instead.
#[async_trait]
pub trait Coach: Send + Sync {
    /// Generate a coaching reply for the user's message
    ///
    /// # Arguments
    ///
    /// * `user_text` - The raw message the user typed
    /// * `ctx` - Task, history, and tone context
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or produces no text
    async fn generate(&self, user_text: &str, ctx: &CoachContext<'_>) -> Result<String>;
}

/// Voice playback collaborator
///
/// Fire-and-forget audio side effect; failures are non-fatal and callers
/// swallow them.
#[async_trait]
pub trait VoicePlayer: Send + Sync {
    /// Speak the given text in the preferred voice
    ///
    /// # Errors
    ///
    /// Returns an error if the playback request fails; callers treat this
    /// as ignorable
    async fn play(&self, text: &str, voice: VoiceGender) -> Result<()>;
}
