use clap::Parser;
use std::process::ExitCode;

use onboard_store::{FilterManager, StoreError};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::{load_config, Config};
use commands::{CommandContext, CommandError};
use dispatch::{NoStoreDispatch, StoreDispatch};

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "ONB_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", error_json(&e));
            } else {
                print_error(&e);
            }
            ExitCode::from(error_exit_status(&e))
        }
    }
}

/// Installs the stderr log subscriber. `ONB_LOG` wins over `--verbose`.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    // Commands that do not need the store must work even when the config
    // file is broken, so `onb config set` can repair it.
    if let Some(dispatch) = NoStoreDispatch::try_from_cli(cli) {
        let config = load_config().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable config");
            Config::default()
        });
        let ctx = CommandContext::from_cli(cli, &config);
        return dispatch.execute(&ctx).await;
    }

    let config = load_config()?;
    let ctx = CommandContext::from_cli(cli, &config);

    let user = commands::resolve_user(cli, &config)?;
    let store = commands::resolve_store(cli, &config)?;
    tracing::debug!(user = %user, store = %store.path().display(), "opening store");
    let mut manager = FilterManager::new(store)?;

    match StoreDispatch::from_cli(cli) {
        Some(dispatch) => dispatch.execute(&ctx, &mut manager, &user).await,
        None => Err(CommandError::Usage(format!(
            "unhandled command: {:?}",
            cli.command
        ))),
    }
}

/// Prints a human-readable error, one line per validation issue.
fn print_error(e: &CommandError) {
    match e.issues() {
        Some(issues) => {
            eprintln!("Error: invalid filter");
            for issue in issues {
                eprintln!("  - {issue}");
            }
        }
        None => eprintln!("Error: {e}"),
    }
}

/// Builds the `{"error": {...}}` document for `--json` mode.
fn error_json(e: &CommandError) -> String {
    let mut error = serde_json::json!({
        "code": error_code(e),
        "message": e.to_string(),
    });
    if let Some(issues) = e.issues() {
        error["issues"] = serde_json::json!(issues);
    }
    let document = serde_json::json!({ "error": error });
    serde_json::to_string_pretty(&document).unwrap_or_else(|_| document.to_string())
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Invalid(_)
        | CommandError::Usage(_)
        | CommandError::Store(StoreError::InvalidFilter(_))
        | CommandError::Store(StoreError::EmptyKeyword)
        | CommandError::Store(StoreError::Validation(_)) => "VALIDATION_ERROR",
        CommandError::Store(StoreError::NotFound { .. }) => "NOT_FOUND",
        CommandError::Store(StoreError::Store(_)) => "STORE_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the process exit status for an error.
fn error_exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Invalid(_)
        | CommandError::Usage(_)
        | CommandError::Store(StoreError::InvalidFilter(_))
        | CommandError::Store(StoreError::EmptyKeyword)
        | CommandError::Store(StoreError::Validation(_)) => 1,
        CommandError::Json(_) => 1,
        CommandError::Store(StoreError::NotFound { .. }) => 4,
        CommandError::Store(StoreError::Store(_)) => 5,
        CommandError::Config(_) => 5,
        CommandError::Io(_) => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_filters::ValidationFailure;
    use onboard_store::DatabaseStoreError;
    use std::path::PathBuf;

    fn invalid() -> CommandError {
        let mut failure = ValidationFailure::new();
        failure.push("name", "Name is required");
        failure.push("criteria.conditions.0.operator", "Invalid operator");
        CommandError::Invalid(failure)
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(error_code(&invalid()), "VALIDATION_ERROR");
        assert_eq!(
            error_code(&CommandError::Store(StoreError::EmptyKeyword)),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            error_code(&CommandError::Store(StoreError::NotFound {
                resource_type: "filter",
                identifier: "3".to_string(),
                suggestion: None,
            })),
            "NOT_FOUND"
        );
        assert_eq!(
            error_code(&CommandError::Store(StoreError::Store(
                DatabaseStoreError::NoDataDir
            ))),
            "STORE_ERROR"
        );
        assert_eq!(
            error_code(&CommandError::Config("x".to_string())),
            "CONFIG_ERROR"
        );
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(error_exit_status(&invalid()), 1);
        assert_eq!(
            error_exit_status(&CommandError::Usage("x".to_string())),
            1
        );
        assert_eq!(
            error_exit_status(&CommandError::Io(std::io::Error::other("x"))),
            3
        );
        assert_eq!(
            error_exit_status(&CommandError::Store(StoreError::Store(
                DatabaseStoreError::ReadError {
                    path: PathBuf::from("/tmp/store.json"),
                    source: std::io::Error::other("x"),
                }
            ))),
            5
        );
    }

    #[test]
    fn test_error_json_includes_issues() {
        let json: serde_json::Value = serde_json::from_str(&error_json(&invalid())).unwrap();
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        let issues = json["error"]["issues"].as_array().unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[1]["path"], "criteria.conditions.0.operator");
    }

    #[test]
    fn test_error_json_omits_issues_for_other_errors() {
        let json: serde_json::Value =
            serde_json::from_str(&error_json(&CommandError::Usage("bad".to_string()))).unwrap();
        assert_eq!(json["error"]["message"], "bad");
        assert!(json["error"].get("issues").is_none());
    }
}
