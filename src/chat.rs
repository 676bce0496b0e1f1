//! Chat orchestration
//!
//! Manages the coach transcript as a two-phase append: the user's turn
//! commits immediately (optimistic, before the reply is known), and the
//! model's turn commits once the coach collaborator resolves. A coach
//! failure becomes a fallback transcript entry rather than an error, so the
//! append is unconditional and the thinking flag is always cleared.

use crate::error::{ElevateError, Result};
use crate::model::{ChatMessage, Role, VoiceGender, COACH_NAME, WELCOME_MESSAGE_ID};
use crate::providers::{Coach, CoachContext, VoicePlayer};
use chrono::{DateTime, Local};

/// Replies shorter than this are always voiced
const AUTO_VOICE_MAX_CHARS: usize = 100;

/// Keywords that force voicing regardless of reply length
const AUTO_VOICE_KEYWORDS: &[&str] = &["congratulations", "push"];

/// Shown in the transcript when the coach collaborator fails
const FALLBACK_REPLY: &str =
    "I'm having trouble connecting right now. Stay on your goals and check back with me soon.";

/// Orchestrates transcript appends and collaborator side effects
///
/// At most one reply is awaited at a time; a second send while thinking is
/// rejected so replies can never interleave out of send order.
pub struct ChatOrchestrator {
    coach: Box<dyn Coach>,
    voice: Box<dyn VoicePlayer>,
    thinking: bool,
}

impl ChatOrchestrator {
    /// Create an orchestrator over the given collaborators
    pub fn new(coach: Box<dyn Coach>, voice: Box<dyn VoicePlayer>) -> Self {
        Self {
            coach,
            voice,
            thinking: false,
        }
    }

    /// Whether a reply is currently being awaited
    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    /// Phase 1: commit the user's turn
    ///
    /// Returns the user-role message to append and marks the session as
    /// thinking. The caller persists the message before invoking phase 2.
    ///
    /// # Errors
    ///
    /// Returns `ElevateError::ReplyInFlight` if a previous send has not
    /// resolved yet.
    pub fn begin_send(&mut self, text: &str, now: DateTime<Local>) -> Result<ChatMessage> {
        if self.thinking {
            return Err(ElevateError::ReplyInFlight.into());
        }
        self.thinking = true;
        Ok(ChatMessage::user(text, now))
    }

    /// Phase 2: resolve the coach reply and commit the model's turn
    ///
    /// Always produces a model-role message: a coach failure is absorbed
    /// into a fallback string so the transcript append is unconditional.
    /// Clears the thinking flag and applies the auto-voice policy before
    /// returning.
    pub async fn complete_send(
        &mut self,
        user_text: &str,
        ctx: CoachContext<'_>,
        now: DateTime<Local>,
    ) -> ChatMessage {
        let reply_text = match self.coach.generate(user_text, &ctx).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Coach call failed, using fallback reply: {}", e);
                FALLBACK_REPLY.to_string()
            }
        };
        self.thinking = false;

        if auto_voice(&reply_text) {
            self.speak(&reply_text, ctx.voice).await;
        }

        ChatMessage::model(reply_text, now)
    }

    /// Synthesize the fixed-id welcome message for a fresh login
    ///
    /// A degenerate one-shot form of the send pattern: no external call, a
    /// well-known id, always role=model.
    pub fn welcome(&self, name: &str, now: DateTime<Local>) -> ChatMessage {
        ChatMessage {
            id: WELCOME_MESSAGE_ID.to_string(),
            role: Role::Model,
            text: format!(
                "Hello {}! I am {}. I'm here to push you to your limits and celebrate your wins. Let's get to work.",
                name, COACH_NAME
            ),
            timestamp: now.to_rfc3339(),
        }
    }

    /// Forward text to the voice collaborator, swallowing any failure
    ///
    /// Voice is a non-essential enhancement; a failed playback must never
    /// surface to the user.
    pub async fn speak(&self, text: &str, voice: VoiceGender) {
        if let Err(e) = self.voice.play(text, voice).await {
            tracing::debug!("Voice playback failed (ignored): {}", e);
        }
    }
}

/// Auto-voice policy for coach replies
///
/// A reply is voiced when it is short or when its lowercased text contains a
/// congratulatory or exertion keyword. Any text satisfying the predicate
/// must trigger playback; nothing else does.
pub fn auto_voice(text: &str) -> bool {
    if text.chars().count() < AUTO_VOICE_MAX_CHARS {
        return true;
    }
    let lowered = text.to_lowercase();
    AUTO_VOICE_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}
