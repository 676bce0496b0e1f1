//! Error types for Elevate
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Elevate operations
///
/// This enum encompasses all possible errors that can occur during
/// state management, persistence, coach interactions, and voice playback.
#[derive(Error, Debug)]
pub enum ElevateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persistent store errors (open, read, write, clear)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Coach collaborator errors (API calls, malformed replies)
    #[error("Coach error: {0}")]
    Coach(String),

    /// Voice playback collaborator errors
    #[error("Voice error: {0}")]
    Voice(String),

    /// Action requires a logged-in user
    #[error("Not logged in")]
    NotLoggedIn,

    /// A coach reply is already being awaited for this session
    #[error("A reply is already in flight; wait for the coach to finish")]
    ReplyInFlight,

    /// Invalid user input (empty name, unknown task id, zero goal)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Elevate operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
