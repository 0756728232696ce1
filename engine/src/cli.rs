//! CLI interface for Lingua
//!
//! This module provides the command-line interface using clap's derive
//! API. It defines all commands and global flags for driving the tutor
//! crew.

use clap::{Parser, Subcommand};

/// Lingua language-tutor agent crew
///
/// A multi-agent orchestration demo: a root tutor agent that delegates to
/// planning, role-play, and assessment specialists backed by a model
/// endpoint.
#[derive(Parser, Debug)]
#[command(name = "lingua")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Use the flat composition: the tutor holds every capability
    /// directly instead of delegating to specialists
    #[arg(long, global = true)]
    pub flat: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the scripted demo conversation
    Demo,

    /// Send a single utterance to the tutor
    Chat {
        /// What to say
        utterance: String,
    },

    /// Show the agent tree and each agent's capabilities
    Crew,

    /// Validate configuration and check backend health
    Doctor,
}
