//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the onb CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// onb - saved filters and keywords for onboarding data
#[derive(Parser, Debug)]
#[command(name = "onb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Act as this user (default: from config, else anonymous)
    #[arg(long, global = true, env = "ONB_USER")]
    pub user: Option<String>,

    /// Path to the store file (default: XDG data directory)
    #[arg(long, global = true, env = "ONB_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List and manage saved filters
    #[command(alias = "f")]
    Filters {
        #[command(subcommand)]
        command: Option<FiltersCommands>,
    },

    /// List and manage keywords
    #[command(alias = "k")]
    Keywords {
        #[command(subcommand)]
        command: Option<KeywordsCommands>,
    },

    /// View and edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// How the conditions of a new filter combine
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogicArg {
    #[default]
    And,
    Or,
}

/// Filter subcommands
#[derive(Subcommand, Debug)]
pub enum FiltersCommands {
    /// List filters (default)
    #[command(alias = "ls")]
    List {
        /// Only filters in this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show filter details
    Show {
        /// Filter ID
        id: i64,
    },

    /// Create a new filter
    Add {
        /// Filter name
        name: String,

        /// Filter category
        #[arg(short, long)]
        category: String,

        /// How conditions combine
        #[arg(long, value_enum, default_value_t = LogicArg::And)]
        logic: LogicArg,

        /// Condition as FIELD:OPERATOR:VALUE (repeatable)
        #[arg(short = 'w', long = "where", value_name = "CONDITION", action = clap::ArgAction::Append)]
        conditions: Vec<String>,

        /// Read the criteria object from a JSON file ("-" for stdin)
        #[arg(long, value_name = "PATH", conflicts_with_all = ["conditions", "logic"])]
        criteria_file: Option<String>,

        /// Save the filter switched off
        #[arg(long)]
        inactive: bool,
    },

    /// Validate a filter document without saving it
    Validate {
        /// JSON file to validate ("-" for stdin)
        path: String,
    },

    /// Run saved filters over a JSON array of records
    Apply {
        /// JSON file holding the records ("-" for stdin)
        #[arg(short, long, value_name = "PATH")]
        records: String,

        /// Only use filters in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Only use these filters (repeatable)
        #[arg(long = "id", value_name = "ID", action = clap::ArgAction::Append)]
        ids: Vec<i64>,
    },

    /// Switch a filter on
    Enable {
        /// Filter ID
        id: i64,
    },

    /// Switch a filter off
    Disable {
        /// Filter ID
        id: i64,
    },

    /// Delete a filter
    #[command(alias = "rm")]
    Delete {
        /// Filter ID
        id: i64,
    },
}

/// Keyword subcommands
#[derive(Subcommand, Debug)]
pub enum KeywordsCommands {
    /// List keywords (default)
    #[command(alias = "ls")]
    List {
        /// Only keywords in this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Add keywords (comma-separated values add several)
    Add {
        /// Keyword text
        keyword: String,

        /// Keyword category
        #[arg(short, long)]
        category: String,
    },

    /// Delete a keyword
    #[command(alias = "rm")]
    Delete {
        /// Keyword ID
        id: i64,
    },

    /// List keyword categories
    Categories,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}
