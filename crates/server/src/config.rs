//! # Application Configuration
//!
//! Configuration is layered, later layers winning:
//!
//! 1. the built-in task prompts from `promptplus::prompts::tasks`;
//! 2. `config.yml`, or `config.{AI_PROVIDER}.yml` when it is missing;
//! 3. an optional `prompt.yml` with prompt overrides;
//! 4. plain environment variables for top-level keys (`PORT`);
//! 5. `PROMPTPLUS_`-prefixed variables, `__` separating nested keys.
//!
//! `${VAR}` references inside the YAML files are expanded from the
//! environment before parsing.

use config::{
    Config as ConfigBuilder, Environment, File, FileFormat, Value as ConfigValue,
    ValueKind as ConfigValueKind,
};
use promptplus::{analysis::OptionStrategy, prompts::tasks::*, types::ProviderConfig};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::{collections::HashMap, env, fs, path::Path};
use thiserror::Error;
use tracing::info;

/// The provider every built-in task points at.
pub const DEFAULT_PROVIDER: &str = "default";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    General(String),
    #[error("{0}")]
    NotFound(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// How the options step gets its option schema.
    #[serde(default)]
    pub option_strategy: OptionStrategy,
    /// Where generated prompts are recorded.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Seconds a session may stay untouched before it is evicted.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
    /// Named, reusable AI provider configurations.
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider and prompts per task.
    pub tasks: HashMap<String, TaskConfig>,
}

fn default_port() -> u16 {
    9090
}

fn default_session_idle_secs() -> u64 {
    crate::sessions::DEFAULT_SESSION_IDLE.as_secs()
}

/// The remote history store. Without an endpoint, records are only logged.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HistoryConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// One task as configured. Missing fields fall back to the built-in layer.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TaskConfig {
    /// Key into `providers`.
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
}

impl AppConfig {
    /// Every task must point at a declared provider.
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, task) in &self.tasks {
            if let Some(provider) = &task.provider {
                if !self.providers.contains_key(provider) {
                    return Err(ConfigError::General(format!(
                        "task '{name}' uses provider '{provider}', which is not declared under 'providers'"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The built-in tasks as a `config::Value` table, used as the lowest layer.
fn builtin_tasks() -> HashMap<String, ConfigValue> {
    [
        (
            QUESTION_ANALYSIS_TASK,
            QUESTION_ANALYSIS_SYSTEM_PROMPT,
            QUESTION_ANALYSIS_USER_PROMPT,
        ),
        (
            CATALOG_ANALYSIS_TASK,
            CATALOG_ANALYSIS_SYSTEM_PROMPT,
            CATALOG_ANALYSIS_USER_PROMPT,
        ),
        (
            PROMPT_SYNTHESIS_TASK,
            PROMPT_SYNTHESIS_SYSTEM_PROMPT,
            PROMPT_SYNTHESIS_USER_PROMPT,
        ),
    ]
    .into_iter()
    .map(|(name, system_prompt, user_prompt)| {
        let table = HashMap::from([
            ("provider".to_string(), ConfigValue::from(DEFAULT_PROVIDER)),
            ("system_prompt".to_string(), ConfigValue::from(system_prompt)),
            ("user_prompt".to_string(), ConfigValue::from(user_prompt)),
        ]);
        (
            name.to_string(),
            ConfigValue::new(None, ConfigValueKind::Table(table)),
        )
    })
    .collect()
}

/// Expands `${VAR}` from the environment. Unset variables become empty.
pub fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded = re.replace_all(content, |caps: &Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });
    Ok(expanded.into_owned())
}

/// Reads a YAML layer with variables expanded, or `None` if the file is absent.
fn read_layer(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;
    substitute_env_vars(&content).map(Some)
}

/// `config.yml` next to the manifest, else the template for `AI_PROVIDER`.
fn main_config_path(base_path: &str) -> String {
    let user_config_path = format!("{base_path}/config.yml");
    if Path::new(&user_config_path).exists() {
        info!("Loading user-defined configuration from '{user_config_path}'.");
        return user_config_path;
    }
    let provider = env::var("AI_PROVIDER").unwrap_or_else(|_| "local".to_string());
    let fallback_path = format!("{base_path}/config.{provider}.yml");
    info!("'{user_config_path}' not found. Falling back to '{fallback_path}' (AI_PROVIDER='{provider}').");
    fallback_path
}

/// Loads the layered configuration. `config_path_override` replaces layer 2's
/// file lookup and is what tests use.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder().set_default("tasks", builtin_tasks())?;

    let main_path = match config_path_override {
        Some(path) => path.to_string(),
        None => main_config_path(base_path),
    };
    let main_content = read_layer(&main_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Main config file not found at '{main_path}'. Create 'config.yml' or set AI_PROVIDER to 'local' or 'gemini'."
        ))
    })?;
    builder = builder.add_source(File::from_str(&main_content, FileFormat::Yaml));

    let prompt_path = format!("{base_path}/prompt.yml");
    if let Some(prompt_content) = read_layer(&prompt_path)? {
        info!("Loading prompt overrides from '{prompt_path}'.");
        builder = builder.add_source(File::from_str(&prompt_content, FileFormat::Yaml));
    }

    let config: AppConfig = builder
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("PROMPTPLUS")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tasks_cover_every_task() {
        let tasks = builtin_tasks();
        for name in [
            QUESTION_ANALYSIS_TASK,
            CATALOG_ANALYSIS_TASK,
            PROMPT_SYNTHESIS_TASK,
        ] {
            assert!(tasks.contains_key(name), "{name}");
        }
    }

    #[test]
    fn lowercase_references_are_not_expanded() {
        let content = "api_url: \"${not_a_var}\"";
        assert_eq!(substitute_env_vars(content).unwrap(), content);
    }
}
