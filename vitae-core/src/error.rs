//! Error types for vitae-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Filesystem failure while scanning or reading a template directory.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema descriptor parse error: includes file path and line context from serde_yaml.
    #[error("failed to parse schema at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Structurally valid YAML that violates the schema rules.
    #[error("invalid schema for template '{template}': field '{field}' {reason}")]
    InvalidSchema {
        template: String,
        field: String,
        reason: &'static str,
    },

    /// No template is published under the requested id.
    #[error("template not found: {id}")]
    NotFound { id: String },
}

/// Errors from loading `~/.vitae/config.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`: cannot locate `~/.vitae/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.into(),
        source,
    }
}
