//! Error types for ctfboard.
//!
//! This module defines all error types used throughout the ctfboard crate,
//! from record storage failures up to user-visible registration errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for ctfboard operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Domain Errors ===
    /// A team with the same name is already registered.
    #[error("Team with this name already exists!")]
    DuplicateTeam {
        /// The rejected team name.
        team_name: String,
    },

    /// The named score field does not exist.
    #[error("unknown score field '{0}' (expected defence, attack or uptime)")]
    UnknownScoreField(String),

    /// The named screen does not exist.
    #[error("unknown screen '{0}' (expected participants or leaderboard)")]
    UnknownScreen(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for ctfboard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a duplicate team error.
    #[must_use]
    pub fn duplicate_team(team_name: impl Into<String>) -> Self {
        Self::DuplicateTeam {
            team_name: team_name.into(),
        }
    }

    /// Check if this error was caused by user input rather than the environment.
    ///
    /// User errors are shown as status messages; everything else is a failure
    /// of the storage or configuration layer.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateTeam { .. } | Self::UnknownScoreField(_) | Self::UnknownScreen(_)
        )
    }
}
