//! Vitae core library: template types, the immutable template registry,
//! user configuration and errors.
//!
//! - [`types`]: ids, field schema and template definitions
//! - [`registry`]: [`TemplateRegistry`] (embedded + directory-backed)
//! - [`config`]: `~/.vitae/config.yaml`
//! - [`error`]: [`RegistryError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use error::{ConfigError, RegistryError};
pub use registry::{Template, TemplateRegistry};
pub use types::{
    FieldSpec, FieldType, TemplateDefinition, TemplateId, TemplateSummary,
};
