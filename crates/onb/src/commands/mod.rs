//! Command implementations for the onb CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod filters;
pub mod keywords;

use std::io::Read;
use std::path::PathBuf;

use onboard_filters::{FilterError, ValidationFailure, ValidationIssue};
use onboard_store::{DatabaseStore, StoreError, UserId};

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Store or manager error.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// A filter document did not validate.
    #[error("invalid filter: {0}")]
    Invalid(ValidationFailure),

    /// Malformed command-line input.
    #[error("{0}")]
    Usage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Returns the validation issues carried by the error, if any.
    pub fn issues(&self) -> Option<&[ValidationIssue]> {
        match self {
            CommandError::Invalid(failure) => Some(failure.issues()),
            CommandError::Store(StoreError::InvalidFilter(e)) => Some(e.issues()),
            _ => None,
        }
    }
}

impl From<FilterError> for CommandError {
    fn from(e: FilterError) -> Self {
        CommandError::Store(StoreError::InvalidFilter(e))
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and config.
    ///
    /// Colors are off when `--no-color` is given, when `NO_COLOR` is set, or
    /// when the config disables them.
    pub fn from_cli(cli: &Cli, config: &config::Config) -> Self {
        let color_allowed = std::env::var_os("NO_COLOR").is_none()
            && config.output.color.unwrap_or(true);
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && color_allowed,
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}

/// Resolves the acting user: flag or `ONB_USER`, then config, then anonymous.
pub fn resolve_user(cli: &Cli, config: &config::Config) -> Result<UserId> {
    let explicit = cli.user.as_deref().or(config.user_id.as_deref());
    match explicit {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(UserId::anonymous()),
    }
}

/// Resolves the store file: flag or `ONB_STORE`, then config, then the XDG
/// data path.
pub fn resolve_store(cli: &Cli, config: &config::Config) -> Result<DatabaseStore> {
    let explicit: Option<PathBuf> = cli.store.clone().or_else(|| config.store.path.clone());
    match explicit {
        Some(path) => Ok(DatabaseStore::with_path(path)),
        None => Ok(DatabaseStore::new().map_err(StoreError::from)?),
    }
}

/// Reads a whole input document from a file path, or stdin for `-`.
pub async fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CommandError::Usage(format!("failed to read '{path}': {e}")))
}
