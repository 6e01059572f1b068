//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Register command arguments.
#[derive(Debug, Args)]
pub struct RegisterCommand {
    /// Team name (must not already be registered)
    #[arg(short, long)]
    pub team: String,

    /// Captain name
    #[arg(long, default_value = "")]
    pub captain: String,

    /// Contact email
    #[arg(long, default_value = "")]
    pub email: String,

    /// Contact phone
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Comma-separated team members
    #[arg(short, long, default_value = "")]
    pub members: String,
}

impl From<RegisterCommand> for crate::model::Registration {
    fn from(cmd: RegisterCommand) -> Self {
        Self {
            team_name: cmd.team,
            captain_name: cmd.captain,
            email: cmd.email,
            phone: cmd.phone,
            members: cmd.members,
        }
    }
}

/// Score command arguments.
#[derive(Debug, Args)]
pub struct ScoreCommand {
    /// Result identifier
    pub id: String,

    /// Field to change
    #[arg(value_enum)]
    pub field: ScoreFieldArg,

    /// New value (numbers that fail to parse count as 0)
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Delete commands.
#[derive(Debug, Subcommand)]
pub enum DeleteCommand {
    /// Delete a participant and its result
    Participant {
        /// Participant identifier
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete a result, keeping the participant
    Result {
        /// Result identifier
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for listing a table.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show rows containing this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Score field argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScoreFieldArg {
    /// Defence score
    #[value(alias = "defenceScore")]
    Defence,
    /// Attack score
    #[value(alias = "attackScore")]
    Attack,
    /// Uptime label
    Uptime,
}

impl From<ScoreFieldArg> for crate::score::ScoreField {
    fn from(arg: ScoreFieldArg) -> Self {
        match arg {
            ScoreFieldArg::Defence => Self::Defence,
            ScoreFieldArg::Attack => Self::Attack,
            ScoreFieldArg::Uptime => Self::Uptime,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Plain,
    /// JSON output
    Json,
}
