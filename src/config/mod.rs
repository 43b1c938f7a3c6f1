mod schema;

pub use schema::{
    Capabilities, Config, Evaluation, MarkerClasses, DEFAULT_DISABLED_CLASS,
    DEFAULT_HIDDEN_CLASS,
};

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::conditions::{Precedence, UnknownInputPolicy};

pub const CONFIG_ENV_VAR: &str = "FORMFX_CONFIG";

/// default location: ~/.formfx/config.json, overridable via FORMFX_CONFIG
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not find home directory"))?
        .join(".formfx")
        .join("config.json"))
}

/// resolve the config path, an explicit override wins over env and default
pub fn get_config_path_with_override(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => get_config_path(),
    }
}

/// load config from the resolved path; a missing file yields the defaults
pub fn load_with_override(path: Option<&Path>) -> Result<Config> {
    let path = get_config_path_with_override(path)?;

    if !path.exists() {
        return Ok(Config::default());
    }

    load_from(&path)
}

/// load config from a file (JSON or JSON5)
pub fn load_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// parse config text (JSON or JSON5)
pub fn parse(content: &str) -> Result<Config> {
    let config: Config = json5::from_str(content)?;
    Ok(config)
}

pub fn save_with_override(config: &Config, path: Option<&Path>) -> Result<()> {
    let path = get_config_path_with_override(path)?;

    // ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config = match parse(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid config: {}", e));
        }
    };

    Ok(validate(&config))
}

/// semantic checks that serde cannot express
pub fn validate(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();

    for (key, class) in [
        ("classes.hidden", &config.classes.hidden),
        ("classes.disabled", &config.classes.disabled),
    ] {
        if class.is_empty() {
            errors.push(format!("{}: class name must not be empty", key));
        } else if class.chars().any(char::is_whitespace) {
            errors.push(format!(
                "{}: class name '{}' must not contain whitespace",
                key, class
            ));
        }
    }

    if !config.classes.hidden.is_empty() && config.classes.hidden == config.classes.disabled {
        errors.push(format!(
            "classes: hidden and disabled share the class '{}'",
            config.classes.hidden
        ));
    }

    errors
}

pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["classes", "hidden"] => {
            config.classes.hidden = value.trim().to_string();
        }
        ["classes", "disabled"] => {
            config.classes.disabled = value.trim().to_string();
        }
        ["evaluation", "precedence"] => {
            config.evaluation.precedence = match value.to_lowercase().as_str() {
                "left_to_right" | "left-to-right" => Precedence::LeftToRight,
                "standard" => Precedence::Standard,
                _ => {
                    return Err(anyhow!(
                        "Invalid precedence: {}. Use left_to_right or standard",
                        value
                    ))
                }
            };
        }
        ["evaluation", "unknown_input"] => {
            config.evaluation.unknown_input = match value.to_lowercase().as_str() {
                "error" => UnknownInputPolicy::Error,
                "false" => UnknownInputPolicy::False,
                _ => {
                    return Err(anyhow!(
                        "Invalid unknown_input: {}. Use error or false",
                        value
                    ))
                }
            };
        }
        ["capabilities", "switch"] => {
            config.capabilities.switch = parse_bool(value)?;
        }
        ["capabilities", "quoted_classnames"] => {
            config.capabilities.quoted_classnames = parse_bool(value)?;
        }
        _ => {
            return Err(anyhow!(
                "Unknown config key: {}. Valid keys: classes.hidden, classes.disabled, evaluation.precedence, evaluation.unknown_input, capabilities.switch, capabilities.quoted_classnames",
                key
            ));
        }
    }

    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(anyhow!(
            "Invalid boolean value: {}. Use true/false, yes/no, 1/0, or on/off",
            value
        )),
    }
}
