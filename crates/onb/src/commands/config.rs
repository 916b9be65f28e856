//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/onb/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable that overrides the config file path.
const CONFIG_ENV: &str = "ONB_CONFIG";

/// Keys accepted by `onb config set`.
const VALID_KEYS: &str = "user_id, output.color, store.path";

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version. Defaults to the current version when absent.
    #[serde(default = "default_version")]
    pub version: u32,

    /// User to act as when `--user` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Store settings.
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            user_id: None,
            output: OutputConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Store configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Gets the config file path.
///
/// Uses `ONB_CONFIG` if set, then `$XDG_CONFIG_HOME/onb/config.toml`, then
/// `~/.config/onb/config.toml` on all platforms.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("onb").join("config.toml"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("onb").join("config.toml"))
        .ok_or_else(|| CommandError::Config("could not determine config directory".to_string()))
}

/// Loads the configuration from disk, or the defaults if there is no file.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("failed to read config: {e}")))?;

    let config = parse_config(&content)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn parse_config(content: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(content)
        .map_err(|e| CommandError::Config(format!("failed to parse config: {e}")))?;
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Loads the configuration for `config set`.
///
/// A file that exists but does not parse is replaced by the defaults, so a
/// broken config can be rewritten from the command line.
fn load_config_for_update() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("failed to read config: {e}")))?;

    match parse_config(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "replacing unparsable config");
            Ok(Config::default())
        }
    }
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<PathBuf> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("failed to create config directory: {e}"))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("failed to serialize config: {e}")))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("failed to write config: {e}")))?;

    Ok(path)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    let header = "Configuration";
    if ctx.use_colors {
        println!("{}\n", header.green().bold());
    } else {
        println!("{header}\n");
    }

    println!("File: {}", path.display());
    println!("Exists: {}\n", path.exists());

    if !path.exists() {
        println!("(No config file exists. Run 'onb config set <key> <value>' to create one.)");
        return Ok(());
    }

    println!("Settings:");
    if let Some(ref user_id) = config.user_id {
        println!("  user_id: {user_id}");
    }

    println!("\n[output]");
    if let Some(color) = config.output.color {
        println!("  color: {color}");
    }

    println!("\n[store]");
    if let Some(ref store_path) = config.store.path {
        println!("  path: {}", store_path.display());
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config_for_update()?;
    apply_setting(&mut config, &opts.key, &opts.value)?;
    let path = save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Applies one `key = value` setting to `config`.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key.split_once('.') {
        None if key == "user_id" => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(CommandError::Config("user_id cannot be empty".to_string()));
            }
            config.user_id = Some(trimmed.to_string());
        }
        Some(("output", "color")) => {
            config.output.color = Some(parse_bool(value)?);
        }
        Some(("store", "path")) => {
            config.store.path = Some(PathBuf::from(value));
        }
        _ => {
            return Err(CommandError::Config(format!(
                "unknown config key '{key}'. Valid keys: {VALID_KEYS}"
            )));
        }
    }
    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "invalid boolean value '{s}'. Use true/false, yes/no, 1/0, or on/off"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    /// Points `ONB_CONFIG` at `path` for the duration of `f`.
    fn with_config_env<T>(path: &std::path::Path, f: impl FnOnce() -> T) -> T {
        let original = env::var(CONFIG_ENV).ok();
        env::set_var(CONFIG_ENV, path);
        let result = f();
        match original {
            Some(value) => env::set_var(CONFIG_ENV, value),
            None => env::remove_var(CONFIG_ENV),
        }
        result
    }

    #[test]
    fn test_parse_bool_values() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("YES").unwrap());
        assert!(parse_bool("on").unwrap());
        assert!(!parse_bool("false").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.user_id.is_none());
        assert!(config.output.color.is_none());
        assert!(config.store.path.is_none());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1
user_id = "alice"

[output]
color = false

[store]
path = "/data/onb.json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.user_id.as_deref(), Some("alice"));
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.store.path, Some(PathBuf::from("/data/onb.json")));
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.user_id.is_none());
    }

    #[test]
    fn test_config_serialization_skips_unset() {
        let config = Config {
            user_id: Some("bob".to_string()),
            ..Config::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("user_id = \"bob\""));
        assert!(!toml_str.contains("color"));
    }

    #[test]
    fn test_apply_setting_known_keys() {
        let mut config = Config::default();
        apply_setting(&mut config, "user_id", " alice ").unwrap();
        apply_setting(&mut config, "output.color", "off").unwrap();
        apply_setting(&mut config, "store.path", "/tmp/store.json").unwrap();

        assert_eq!(config.user_id.as_deref(), Some("alice"));
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/store.json")));
    }

    #[test]
    fn test_apply_setting_rejects_unknown_keys() {
        let mut config = Config::default();
        let err = apply_setting(&mut config, "output.theme", "dark").unwrap_err();
        assert!(err.to_string().contains("unknown config key 'output.theme'"));
        assert!(apply_setting(&mut config, "token", "x").is_err());
        assert!(apply_setting(&mut config, "user_id", "  ").is_err());
    }

    #[test]
    #[serial]
    fn test_config_path_env_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        let resolved = with_config_env(&path, get_config_path).unwrap();
        assert_eq!(resolved, path);
    }

    #[test]
    #[serial]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let loaded = with_config_env(&path, || {
            let mut config = load_config().unwrap();
            assert!(config.user_id.is_none());
            config.user_id = Some("carol".to_string());
            save_config(&config).unwrap();
            load_config().unwrap()
        });

        assert_eq!(loaded.user_id.as_deref(), Some("carol"));
        assert!(path.exists());
    }

    #[test]
    #[serial]
    fn test_load_config_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "user_id = [").unwrap();

        let result = with_config_env(&path, load_config);
        assert!(matches!(result, Err(CommandError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_set_rewrites_unparsable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "user_id = [").unwrap();
        let ctx = CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
        };
        let opts = ConfigSetOptions {
            key: "user_id".to_string(),
            value: "dana".to_string(),
        };

        let loaded = with_config_env(&path, || {
            execute_set(&ctx, &opts).unwrap();
            load_config().unwrap()
        });
        assert_eq!(loaded.user_id.as_deref(), Some("dana"));
    }

    #[test]
    #[serial]
    fn test_set_still_rejects_bad_key_on_unparsable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "user_id = [").unwrap();
        let ctx = CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
        };
        let opts = ConfigSetOptions {
            key: "theme".to_string(),
            value: "dark".to_string(),
        };

        assert!(with_config_env(&path, || execute_set(&ctx, &opts)).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "user_id = [");
    }
}
