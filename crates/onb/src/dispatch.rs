//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands split by whether they touch the store. Config, completions,
//! help and `filters validate` run without opening it.

use onboard_store::{FilterManager, UserId};

use crate::cli::{Cli, Commands, ConfigCommands, FiltersCommands, KeywordsCommands, Shell};
use crate::commands::filters::{FiltersAddOptions, FiltersApplyOptions, FiltersListOptions};
use crate::commands::keywords::KeywordsAddOptions;
use crate::commands::{self, CommandContext, CommandError, Result};

/// Commands that run without the store.
pub enum NoStoreDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Validate(&'a str),
    Help,
}

impl<'a> NoStoreDispatch<'a> {
    /// Try to create a no-store dispatch from the CLI command.
    /// Returns None if the command needs the store.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            Some(Commands::Filters {
                command: Some(FiltersCommands::Validate { path }),
            }) => Some(Self::Validate(path)),
            None => Some(Self::Help),
            _ => None,
        }
    }

    /// Executes the command.
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Validate(path) => commands::filters::execute_validate(ctx, path).await,
            Self::Help => {
                if !ctx.quiet {
                    println!("onb - saved filters and keywords");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that read or write the store.
pub enum StoreDispatch<'a> {
    Filters(&'a Option<FiltersCommands>),
    Keywords(&'a Option<KeywordsCommands>),
}

impl<'a> StoreDispatch<'a> {
    /// Create a store dispatch from the CLI command.
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Filters { command }) => Some(Self::Filters(command)),
            Some(Commands::Keywords { command }) => Some(Self::Keywords(command)),
            _ => None,
        }
    }

    /// Executes the command against `manager` as `user`.
    pub async fn execute(
        &self,
        ctx: &CommandContext,
        manager: &mut FilterManager,
        user: &UserId,
    ) -> Result<()> {
        match self {
            Self::Filters(command) => dispatch_filters(ctx, command, manager, user).await,
            Self::Keywords(command) => dispatch_keywords(ctx, command, manager, user).await,
        }
    }
}

/// Dispatch filters subcommands.
async fn dispatch_filters(
    ctx: &CommandContext,
    command: &Option<FiltersCommands>,
    manager: &mut FilterManager,
    user: &UserId,
) -> Result<()> {
    use commands::filters;

    match command {
        None => filters::execute(ctx, &FiltersListOptions::default(), manager, user),
        Some(FiltersCommands::List { category }) => {
            let opts = FiltersListOptions {
                category: category.clone(),
            };
            filters::execute(ctx, &opts, manager, user)
        }
        Some(FiltersCommands::Show { id }) => filters::execute_show(ctx, *id, manager, user),
        Some(FiltersCommands::Add {
            name,
            category,
            logic,
            conditions,
            criteria_file,
            inactive,
        }) => {
            let opts = FiltersAddOptions {
                name: name.clone(),
                category: category.clone(),
                logic: *logic,
                conditions: conditions.clone(),
                criteria_file: criteria_file.clone(),
                inactive: *inactive,
            };
            filters::execute_add(ctx, &opts, manager, user).await
        }
        Some(FiltersCommands::Validate { path }) => filters::execute_validate(ctx, path).await,
        Some(FiltersCommands::Apply {
            records,
            category,
            ids,
        }) => {
            let opts = FiltersApplyOptions {
                records: records.clone(),
                category: category.clone(),
                ids: ids.clone(),
            };
            filters::execute_apply(ctx, &opts, manager, user).await
        }
        Some(FiltersCommands::Enable { id }) => {
            filters::execute_set_active(ctx, *id, true, manager, user).await
        }
        Some(FiltersCommands::Disable { id }) => {
            filters::execute_set_active(ctx, *id, false, manager, user).await
        }
        Some(FiltersCommands::Delete { id }) => {
            filters::execute_delete(ctx, *id, manager, user).await
        }
    }
}

/// Dispatch keywords subcommands.
async fn dispatch_keywords(
    ctx: &CommandContext,
    command: &Option<KeywordsCommands>,
    manager: &mut FilterManager,
    user: &UserId,
) -> Result<()> {
    use commands::keywords;

    match command {
        None => keywords::execute(ctx, None, manager, user),
        Some(KeywordsCommands::List { category }) => {
            keywords::execute(ctx, category.as_deref(), manager, user)
        }
        Some(KeywordsCommands::Add { keyword, category }) => {
            let opts = KeywordsAddOptions {
                keyword: keyword.clone(),
                category: category.clone(),
            };
            keywords::execute_add(ctx, &opts, manager, user).await
        }
        Some(KeywordsCommands::Delete { id }) => {
            keywords::execute_delete(ctx, *id, manager, user).await
        }
        Some(KeywordsCommands::Categories) => keywords::execute_categories(ctx, manager),
    }
}
