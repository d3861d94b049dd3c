//! Render entrypoint shared by every caller: registry lookup, model building,
//! format dispatch and the pdf-to-source fallback.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use vitae_core::{RegistryError, Template, TemplateDefinition, TemplateRegistry, TemplateSummary};
use vitae_renderer::{summarize, CanonicalDataModel, CompiledTemplate, SanitizedModel};

use crate::artifact::{Artifact, Format};
use crate::compile::{compile_pdf, CompilerConfig};
use crate::error::RenderFailure;

/// Turns a template id plus a raw submission into an [`Artifact`].
///
/// Cheap to clone; the registry is shared read-only and each call is
/// independent of every other.
#[derive(Debug, Clone)]
pub struct ArtifactCompiler {
    registry: Arc<TemplateRegistry>,
    compiler: CompilerConfig,
}

impl ArtifactCompiler {
    pub fn new(registry: Arc<TemplateRegistry>, compiler: CompilerConfig) -> Self {
        Self { registry, compiler }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn compiler(&self) -> &CompilerConfig {
        &self.compiler
    }

    /// Summaries of every available template, sorted by id.
    pub fn list(&self) -> Vec<TemplateSummary> {
        self.registry.list()
    }

    /// Full schema for one template.
    pub fn schema(&self, id: &str) -> Result<&TemplateDefinition, RenderFailure> {
        self.template(id).map(|t| &t.definition)
    }

    /// Render `submission` with template `id` in the requested `format`.
    ///
    /// Malformed submissions are never rejected. A failed pdf compile is not an
    /// error: the expanded source is returned instead.
    pub fn render(
        &self,
        id: &str,
        submission: &Value,
        format: Format,
    ) -> Result<Artifact, RenderFailure> {
        let started = Instant::now();
        let template = self.template(id)?;
        let stem = template.definition.id.as_str();
        tracing::debug!(template = stem, %format, "render");

        let model = CanonicalDataModel::build(submission);
        if format == Format::Summary {
            return Ok(Artifact::summary(stem, summarize(&model)));
        }

        let sanitized = SanitizedModel::from_model(&model).map_err(RenderFailure::unexpected)?;
        let source = CompiledTemplate::parse(&template.body).expand(&sanitized);
        if format == Format::Source {
            return Ok(Artifact::source(stem, source));
        }

        match compile_pdf(&self.compiler, stem, &source) {
            Ok(bytes) => {
                tracing::info!(
                    template = stem,
                    bytes = bytes.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "compiled pdf"
                );
                Ok(Artifact::pdf(stem, bytes))
            }
            Err(e) if e.is_compiler_failure() => {
                tracing::warn!(
                    template = stem,
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "pdf compile failed; returning source"
                );
                Ok(Artifact::source(stem, source))
            }
            Err(e) => {
                tracing::error!(template = stem, error = %e, "render failed");
                Err(RenderFailure::unexpected(e))
            }
        }
    }

    fn template(&self, id: &str) -> Result<&Template, RenderFailure> {
        self.registry.get_template(id).map_err(|e| match e {
            RegistryError::NotFound { id } => RenderFailure::NotFound { id },
            other => RenderFailure::unexpected(other),
        })
    }
}
