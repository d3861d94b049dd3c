//! Subcommands and the settings they share.

pub mod render;
pub mod templates;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use vitae_compiler::{ArtifactCompiler, CompilerConfig};
use vitae_core::{config, config::Settings, TemplateRegistry};

/// Options accepted by every subcommand. Flags and environment variables
/// override `~/.vitae/config.yaml`.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Directory of user templates, layered over the built-in ones.
    #[arg(long, global = true, env = "VITAE_TEMPLATES_DIR", value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Compiler executable used for pdf output.
    #[arg(long, global = true, env = "VITAE_COMPILER", value_name = "PROGRAM")]
    pub compiler: Option<PathBuf>,

    /// Seconds to wait for the compiler before giving up.
    #[arg(long, global = true, env = "VITAE_COMPILE_TIMEOUT", value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

impl GlobalArgs {
    /// Config file values with flag/env overrides applied.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match dirs::home_dir() {
            Some(home) => config::load_at(&home).with_context(|| {
                format!(
                    "failed to load {}",
                    config::config_path_at(&home).display()
                )
            })?,
            None => Settings::default(),
        };
        if let Some(dir) = &self.templates_dir {
            settings.templates_dir = Some(dir.clone());
        }
        if let Some(program) = &self.compiler {
            settings.compiler.program = program.clone();
        }
        if let Some(secs) = self.timeout_secs {
            settings.compiler.timeout_secs = secs;
        }
        Ok(settings)
    }

    /// Built-in templates plus the user directory, ready to render.
    pub fn artifact_compiler(&self) -> Result<ArtifactCompiler> {
        let settings = self.settings()?;
        let templates_dir = settings
            .templates_dir
            .clone()
            .or_else(|| dirs::home_dir().map(|home| config::default_templates_dir_at(&home)));

        let registry = TemplateRegistry::load(templates_dir.as_deref())
            .context("failed to load templates")?;
        tracing::debug!(
            templates = registry.len(),
            dir = ?templates_dir,
            "loaded template registry"
        );
        Ok(ArtifactCompiler::new(
            Arc::new(registry),
            CompilerConfig::from(&settings.compiler),
        ))
    }
}
