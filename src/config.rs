//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/vargroup/vargroup.toml`
//! 3. Explicit config file passed to [`Settings::load`]
//! 4. Environment variables: `VARGROUP_*` prefix

use std::io::Write;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{GroupVariable, SetDataPolicy, Variable, VariableResult};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {message}")]
    Config { message: String },
}

fn config_err(e: impl std::fmt::Display) -> SettingsError {
    SettingsError::Config {
        message: e.to_string(),
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub set_data_policy: Option<SetDataPolicy>,
    pub report_verbose: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Length handling for group `set_data` (default: strict)
    pub set_data_policy: SetDataPolicy,
    /// Use verbose output in [`Settings::report`] (default: false)
    pub report_verbose: bool,
}

/// Get the XDG config directory for vargroup.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "vargroup").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("vargroup.toml"))
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Absent keys are `None`; values that fail to convert are errors.
fn env_value<T>(result: Result<T, ConfigError>) -> Result<Option<T>, SettingsError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn parse_policy(value: &str) -> Result<SetDataPolicy, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(SetDataPolicy::Strict),
        "lenient" => Ok(SetDataPolicy::Lenient),
        other => Err(SettingsError::Config {
            message: format!("unknown set_data_policy: {}", other),
        }),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            set_data_policy: overlay.set_data_policy.unwrap_or(self.set_data_policy),
            report_verbose: overlay.report_verbose.unwrap_or(self.report_verbose),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional file layered on top of the global config.
    ///   It must exist when given.
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            debug!("loading config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply VARGROUP_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("VARGROUP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(config.get_string("set_data_policy"))? {
            settings.set_data_policy = parse_policy(&val)?;
        }
        if let Some(val) = env_value(config.get_bool("report_verbose"))? {
            settings.report_verbose = val;
        }

        Ok(settings)
    }

    /// Empty group carrying the configured `set_data` policy.
    pub fn new_group(&self, name: impl Into<String>) -> GroupVariable {
        GroupVariable::new(name).with_policy(self.set_data_policy)
    }

    /// Print `variable` in the configured mode.
    pub fn report(&self, variable: &dyn Variable, out: &mut dyn Write) -> VariableResult<()> {
        if self.report_verbose {
            variable.print_verbose(out)
        } else {
            variable.print_standard(out)
        }
    }
}
