//! Command-line interface definition for Elevate
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the interactive session and quick status views.

use clap::{Parser, Subcommand};

/// Elevate - personal productivity and habit tracking with an AI coach
///
/// Track daily tasks with numeric goals, end the day to archive your
/// completion history, and talk it over with the coach.
#[derive(Parser, Debug, Clone)]
#[command(name = "elevate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/elevate.yaml")]
    pub config: String,

    /// Override the state store location
    #[arg(long, env = "ELEVATE_STORE")]
    pub store: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Elevate
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive session (tasks, day cycle, coach chat)
    Session,

    /// Print today's tasks and overall progress
    Status,

    /// Print archived day logs, most recent first
    History,

    /// Clear all persisted state (profile, tasks, history, chat)
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
