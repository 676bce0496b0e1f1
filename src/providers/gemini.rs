//! Gemini coach implementation for Elevate
//!
//! This module implements the Coach trait against the Gemini
//! `generateContent` REST endpoint. The system instruction is assembled from
//! the coach persona, the user's current tasks, and recent history so the
//! replies stay grounded in actual progress.

use crate::config::GeminiConfig;
use crate::error::{ElevateError, Result};
use crate::model::{VoiceGender, COACH_NAME};
use crate::providers::{Coach, CoachContext};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Gemini API base URL
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// How many recent history logs to include in the prompt context
const HISTORY_CONTEXT_LIMIT: usize = 7;

/// Gemini API coach
///
/// Connects to the Gemini REST API to generate coaching replies. The
/// `api_base` config field lets tests point the coach at a mock server.
pub struct GeminiCoach {
    client: Client,
    config: GeminiConfig,
}

/// Request structure for the generateContent endpoint
#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
}

/// Content block in Gemini wire format
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

/// Text part in Gemini wire format
#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

/// Response structure from the generateContent endpoint
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// One candidate reply
#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

impl GeminiCoach {
    /// Create a new Gemini coach instance
    ///
    /// # Arguments
    ///
    /// * `config` - Gemini configuration containing model, key, and base URL
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent("elevate/0.1.0")
            .build()
            .map_err(|e| ElevateError::Coach(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized Gemini coach: model={}", config.model);

        Ok(Self { client, config })
    }

    /// Build the generateContent endpoint URL
    fn endpoint(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!("{}/v1beta/models/{}:generateContent", base, self.config.model)
    }

    /// Assemble the system instruction from the coaching context
    fn build_system_prompt(&self, ctx: &CoachContext<'_>) -> String {
        let tone = match ctx.voice {
            VoiceGender::Female => "warm but firm",
            VoiceGender::Male => "direct and energetic",
        };

        let mut prompt = format!(
            "You are {}, a no-nonsense personal productivity coach. \
             Keep replies short and motivating, in a {} tone. \
             Push the user toward their daily goals.\n",
            COACH_NAME, tone
        );

        if ctx.tasks.is_empty() {
            prompt.push_str("\nThe user has no tasks defined yet.\n");
        } else {
            prompt.push_str("\nToday's tasks:\n");
            for task in ctx.tasks {
                prompt.push_str(&format!(
                    "- {}: {}/{} {}\n",
                    task.title, task.completed, task.goal, task.unit
                ));
            }
        }

        if !ctx.history.is_empty() {
            prompt.push_str("\nRecent days (most recent first):\n");
            for log in ctx.history.iter().take(HISTORY_CONTEXT_LIMIT) {
                prompt.push_str(&format!("- {}: {}% completion\n", log.date, log.completion_rate));
            }
        }

        prompt
    }
}

#[async_trait]
impl Coach for GeminiCoach {
    async fn generate(&self, user_text: &str, ctx: &CoachContext<'_>) -> Result<String> {
        let api_key = self
            .config
            .resolved_api_key()
            .ok_or_else(|| ElevateError::Coach("Missing Gemini API key".to_string()))?;

        let request = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: self.build_system_prompt(ctx),
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: user_text.to_string(),
                }],
            }],
        };

        tracing::debug!("Requesting coach reply from {}", self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ElevateError::Coach(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(
                ElevateError::Coach(format!("API returned {}: {}", status, body)).into(),
            );
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ElevateError::Coach(format!("Malformed response: {}", e)))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ElevateError::Coach("Response contained no text".to_string()))?;

        Ok(text.trim().to_string())
    }
}
