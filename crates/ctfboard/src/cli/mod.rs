//! Command-line interface for ctfboard.
//!
//! This module provides the CLI structure for the `ctfboard` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DeleteCommand, ListCommand, OutputFormat, RegisterCommand, ScoreCommand,
    ScoreFieldArg, StatusCommand,
};

/// ctfboard - Scoreboard for capture-the-flag competitions
///
/// Registers teams and tracks their defence, attack and uptime scores in a
/// local database.
#[derive(Debug, Parser)]
#[command(name = "ctfboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the scoreboard database (overrides configuration)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a team
    Register(RegisterCommand),

    /// Change a defence, attack or uptime value
    Score(ScoreCommand),

    /// Delete a participant or a result
    #[command(subcommand)]
    Delete(DeleteCommand),

    /// Show registered participants
    Participants(ListCommand),

    /// Show the leaderboard
    Leaderboard(ListCommand),

    /// Start an interactive session
    Shell,

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
