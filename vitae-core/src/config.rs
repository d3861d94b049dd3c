//! User configuration at `~/.vitae/config.yaml`.
//!
//! Same API pattern as the registry's home-relative helpers:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_COMPILER: &str = "pdflatex";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Top-level settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Directory of user templates layered over the built-ins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    pub compiler: CompilerSettings,
}

/// External typesetting compiler invocation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    pub program: PathBuf,
    pub timeout_secs: u64,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_COMPILER),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `<home>/.vitae/config.yaml`: pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".vitae").join("config.yaml")
}

/// `<home>/.vitae/templates/`: default user template directory.
pub fn default_templates_dir_at(home: &Path) -> PathBuf {
    home.join(".vitae").join("templates")
}

/// Load settings from `<home>/.vitae/config.yaml`; a missing file yields defaults.
pub fn load_at(home: &Path) -> Result<Settings, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
        path: path.clone(),
        source: e,
    })?;
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Settings, ConfigError> {
    load_at(&home()?)
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}
