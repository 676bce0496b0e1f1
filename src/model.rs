//! Domain records for Elevate
//!
//! Plain data types shared across the store, the day-cycle engine, and the
//! chat orchestrator: tasks, archived history logs, the user profile, and
//! chat transcript messages. All records serialize as camelCase JSON so the
//! persisted layout stays stable across versions.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Display name of the application
pub const APP_NAME: &str = "Elevate";

/// Display name of the AI coach persona
pub const COACH_NAME: &str = "Elevate Coach";

/// Fixed id of the one-shot welcome message seeded at login
pub const WELCOME_MESSAGE_ID: &str = "welcome";

/// A tracked daily task with a numeric goal
///
/// Created by user action, mutated on progress updates, and reset (progress
/// zeroed) at each day-cycle rollover. Tasks are never deleted automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, stable identifier (ULID)
    pub id: String,
    /// Short human-readable title
    pub title: String,
    /// Target quantity for one day-cycle
    pub goal: u32,
    /// Current progress; may exceed `goal`
    pub completed: u32,
    /// Display label for the quantity (e.g. "pages", "reps")
    pub unit: String,
    /// Creation instant (RFC-3339)
    pub start_time: String,
    /// Instant of the last mutation (RFC-3339)
    pub last_updated: String,
}

impl Task {
    /// Create a new task with zero progress
    ///
    /// # Arguments
    ///
    /// * `title` - Task title
    /// * `goal` - Target quantity for one day-cycle
    /// * `unit` - Display label for the quantity
    /// * `now` - Creation instant
    pub fn new(title: impl Into<String>, goal: u32, unit: impl Into<String>, now: DateTime<Local>) -> Self {
        let timestamp = now.to_rfc3339();
        Self {
            id: new_id(),
            title: title.into(),
            goal,
            completed: 0,
            unit: unit.into(),
            start_time: timestamp.clone(),
            last_updated: timestamp,
        }
    }

    /// Whether current progress has reached the goal
    pub fn is_done(&self) -> bool {
        self.goal > 0 && self.completed >= self.goal
    }
}

/// An immutable end-of-day archive entry
///
/// Captures a deep snapshot of the task list exactly as it stood at archival
/// time. Once created a log is never mutated; later task edits must not reach
/// the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryLog {
    /// Local calendar day of the archival, `YYYY-MM-DD`
    pub date: String,
    /// Snapshot of the task list at archival time
    pub tasks: Vec<Task>,
    /// Integer percent of goals met, 0-100
    pub completion_rate: u8,
    /// Optional free-text summary of the day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// The opposite theme, used by the theme toggle
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Voice gender preference for spoken playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Female,
    Male,
}

impl VoiceGender {
    /// Parse from a user-supplied string
    ///
    /// # Examples
    ///
    /// ```
    /// use elevate::model::VoiceGender;
    ///
    /// assert_eq!(VoiceGender::parse_str("male").unwrap(), VoiceGender::Male);
    /// assert!(VoiceGender::parse_str("robot").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "female" | "f" => Ok(Self::Female),
            "male" | "m" => Ok(Self::Male),
            other => Err(format!("Unknown voice: {}", other)),
        }
    }

    /// Lowercase wire name of this voice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

/// User-tunable preferences nested inside the profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub voice: VoiceGender,
    pub notifications: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            voice: VoiceGender::Female,
            notifications: true,
        }
    }
}

/// The single user's profile
///
/// `is_logged_in` and `onboarded` are set together at login and never
/// toggled independently. The whole profile is discarded on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name chosen at onboarding; never empty
    pub name: String,
    pub is_logged_in: bool,
    pub onboarded: bool,
    pub preferences: Preferences,
}

impl UserProfile {
    /// Build a fully onboarded profile with default preferences
    pub fn onboard(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_logged_in: true,
            onboarded: true,
            preferences: Preferences::default(),
        }
    }
}

/// Sender of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One turn in the coach chat transcript
///
/// Messages are append-only; storage order equals chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique identifier; ULIDs sort by creation time
    pub id: String,
    pub role: Role,
    pub text: String,
    /// RFC-3339 instant of the append
    pub timestamp: String,
}

impl ChatMessage {
    /// Creates a new user-role message with a fresh id
    pub fn user(text: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            id: new_id(),
            role: Role::User,
            text: text.into(),
            timestamp: now.to_rfc3339(),
        }
    }

    /// Creates a new model-role message with a fresh id
    pub fn model(text: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            id: new_id(),
            role: Role::Model,
            text: text.into(),
            timestamp: now.to_rfc3339(),
        }
    }
}

/// Generate a new ULID for a task or chat message
///
/// ULIDs are sortable by timestamp, which keeps transcript ids
/// monotonic-enough for ordering without a separate counter.
pub fn new_id() -> String {
    Ulid::new().to_string()
}
