//! Elevate - personal productivity and habit tracking library
//!
//! This library provides the core state machine behind the Elevate app:
//! daily task tracking, end-of-day archival, durable persistence, and an
//! AI coach chat with voice playback.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `model`: Domain records (tasks, history logs, user profile, chat)
//! - `store`: Durable state slices backed by an embedded database
//! - `day_cycle`: End-of-day archival and task reset
//! - `chat`: Two-phase transcript appends and auto-voice policy
//! - `app`: Application state controller wiring actions to the above
//! - `providers`: Coach and voice collaborator traits and implementations
//! - `config`: Configuration management
//! - `error`: Error types and result aliases
//! - `cli` / `session`: Command-line front-end
//!
//! # Example
//!
//! ```no_run
//! use elevate::app::App;
//! use elevate::config::Config;
//! use elevate::providers;
//! use elevate::store::Store;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/elevate.yaml")?;
//!     config.validate()?;
//!
//!     let store = Store::open_default()?;
//!     let coach = providers::create_coach(&config)?;
//!     let voice = providers::create_voice(&config)?;
//!
//!     let mut app = App::new(store, coach, voice);
//!     app.login("Sam").await?;
//!     app.add_task("Read", 20, "pages")?;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod chat;
pub mod cli;
pub mod config;
pub mod day_cycle;
pub mod error;
pub mod model;
pub mod providers;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use app::App;
pub use config::Config;
pub use error::{ElevateError, Result};
pub use model::{ChatMessage, HistoryLog, Task, UserProfile};

#[cfg(test)]
pub mod test_utils;
