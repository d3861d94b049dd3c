//! `vitae render <id>`: build an artifact from a submission file.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::{Map, Value};

use vitae_compiler::{write_artifact, Format, WriteResult};

use super::GlobalArgs;

/// Arguments for `vitae render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template id (e.g. "classic").
    pub id: String,

    /// JSON submission file, or `-` for stdin. Either `{"fields": {...}}` or a
    /// bare field mapping. Omitted means an empty submission.
    #[arg(long, short = 'f', value_name = "FILE")]
    pub fields: Option<PathBuf>,

    /// Output format: source | summary | pdf. Unknown values mean pdf.
    #[arg(long, default_value = "pdf")]
    pub format: String,

    /// Directory the artifact is written to.
    #[arg(long, short = 'o', value_name = "DIR", default_value = ".")]
    pub out: PathBuf,

    /// Stream the artifact body to stdout instead of writing a file.
    #[arg(long, conflicts_with = "out")]
    pub stdout: bool,
}

impl RenderArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let compiler = global.artifact_compiler()?;
        let submission = self.read_submission()?;
        let format = Format::from_query(Some(&self.format));

        let artifact = compiler.render(&self.id, &submission, format)?;
        let fell_back = format == Format::Pdf && !artifact.is_binary();

        if self.stdout {
            let mut out = io::stdout().lock();
            out.write_all(artifact.body())
                .and_then(|()| out.flush())
                .context("failed to write artifact to stdout")?;
        } else {
            let result = write_artifact(&self.out, &artifact)
                .with_context(|| format!("failed to write artifact to {}", self.out.display()))?;
            let state = match &result {
                WriteResult::Written { .. } => "wrote",
                WriteResult::Unchanged { .. } => "unchanged",
            };
            println!(
                "✓ {state} {} ({})",
                result.path().display(),
                artifact.content_type()
            );
        }

        if fell_back {
            eprintln!(
                "{} pdf compile failed; produced LaTeX source instead (set RUST_LOG=debug for details)",
                "warning:".yellow().bold()
            );
        }
        Ok(())
    }

    fn read_submission(&self) -> Result<Value> {
        let Some(path) = &self.fields else {
            return Ok(Value::Object(Map::new()));
        };
        let raw = if path.as_os_str() == "-" {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read submission from stdin")?;
            buf
        } else {
            fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?
        };
        if raw.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        let body: Value = serde_json::from_str(&raw).context("submission is not valid JSON")?;
        Ok(unwrap_fields(body))
    }
}

/// `{"fields": {...}}` yields the inner mapping; anything else is used as-is.
fn unwrap_fields(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("fields").is_some_and(Value::is_object) => {
            map.remove("fields").unwrap_or_default()
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_envelope_is_unwrapped() {
        let body = json!({ "fields": { "full_name": "Ada" } });
        assert_eq!(unwrap_fields(body), json!({ "full_name": "Ada" }));
    }

    #[test]
    fn bare_mapping_is_kept() {
        let body = json!({ "full_name": "Ada", "fields": "not a map" });
        assert_eq!(unwrap_fields(body.clone()), body);
    }
}
