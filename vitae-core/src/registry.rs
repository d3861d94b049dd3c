//! Immutable template registry.
//!
//! # Storage layout
//!
//! ```text
//! <templates_dir>/
//!   <id>/
//!     schema.yaml     (or schema.json: name + ordered field schema)
//!     template.tex    (raw template body)
//! ```
//!
//! Built-in templates are baked into the binary with `include_str!`;
//! [`TemplateRegistry::load`] layers a user directory on top of them, with
//! directory entries overriding built-ins by id. Once constructed the registry
//! is never mutated, so `&TemplateRegistry` can be shared freely across threads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{io_err, RegistryError};
use crate::types::{
    FieldSpec, FieldType, SchemaDescriptor, TemplateDefinition, TemplateId, TemplateSummary,
};

pub const SCHEMA_FILE: &str = "schema.yaml";
pub const SCHEMA_FILE_JSON: &str = "schema.json";
pub const BODY_FILE: &str = "template.tex";

// ---------------------------------------------------------------------------
// Embedded templates
// ---------------------------------------------------------------------------

const EMBEDDED: &[(&str, &str, &str)] = &[(
    "classic",
    include_str!("templates/classic/schema.yaml"),
    include_str!("templates/classic/template.tex"),
)];

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// A template definition together with its raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub definition: TemplateDefinition,
    pub body: String,
}

/// Read-only store of published templates keyed by id.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<TemplateId, Template>,
}

impl TemplateRegistry {
    /// Built-in templates only.
    pub fn embedded() -> Result<Self, RegistryError> {
        let mut templates = BTreeMap::new();
        for (id, schema, body) in EMBEDDED {
            let path = PathBuf::from("<embedded>").join(id).join(SCHEMA_FILE);
            let Ok(id) = id.parse::<TemplateId>() else {
                continue;
            };
            let template = parse_template(id.clone(), &path, schema, body)?;
            templates.insert(id, template);
        }
        Ok(Self { templates })
    }

    /// Directory-backed templates only. A missing directory yields an empty registry.
    pub fn from_dir(dir: &Path) -> Result<Self, RegistryError> {
        let mut templates = BTreeMap::new();
        for template in load_dir(dir)? {
            templates.insert(template.definition.id.clone(), template);
        }
        Ok(Self { templates })
    }

    /// Built-in templates overlaid with the contents of `user_dir`, if any.
    pub fn load(user_dir: Option<&Path>) -> Result<Self, RegistryError> {
        let mut registry = Self::embedded()?;
        if let Some(dir) = user_dir {
            for template in load_dir(dir)? {
                tracing::debug!(template = %template.definition.id, "loaded user template");
                registry
                    .templates
                    .insert(template.definition.id.clone(), template);
            }
        }
        Ok(registry)
    }

    /// Schema for `id`, or [`RegistryError::NotFound`].
    pub fn get(&self, id: &str) -> Result<&TemplateDefinition, RegistryError> {
        self.get_template(id).map(|t| &t.definition)
    }

    /// Schema plus raw body for `id`, or [`RegistryError::NotFound`].
    ///
    /// Ids that are not well-formed can never be registered and report `NotFound`.
    pub fn get_template(&self, id: &str) -> Result<&Template, RegistryError> {
        id.parse::<TemplateId>()
            .ok()
            .and_then(|id| self.templates.get(&id))
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })
    }

    /// Raw template body for `id`, or [`RegistryError::NotFound`].
    pub fn body(&self, id: &str) -> Result<&str, RegistryError> {
        self.get_template(id).map(|t| t.body.as_str())
    }

    /// All templates, sorted by id.
    pub fn list(&self) -> Vec<TemplateSummary> {
        self.templates
            .values()
            .map(|t| TemplateSummary::from(&t.definition))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Loading helpers
// ---------------------------------------------------------------------------

fn load_dir(dir: &Path) -> Result<Vec<Template>, RegistryError> {
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut templates = Vec::new();
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let Ok(id) = name.parse::<TemplateId>() else {
            tracing::warn!(dir = %entry.path().display(), "skipping template directory with invalid id");
            continue;
        };

        let root = entry.path();
        let Some(schema_path) = [SCHEMA_FILE, SCHEMA_FILE_JSON]
            .iter()
            .map(|f| root.join(f))
            .find(|p| p.is_file())
        else {
            tracing::warn!(template = %id, "skipping template without schema descriptor");
            continue;
        };
        let body_path = root.join(BODY_FILE);
        if !body_path.is_file() {
            tracing::warn!(template = %id, "skipping template without {BODY_FILE}");
            continue;
        }

        let schema = std::fs::read_to_string(&schema_path).map_err(|e| io_err(&schema_path, e))?;
        let body = std::fs::read_to_string(&body_path).map_err(|e| io_err(&body_path, e))?;
        templates.push(parse_template(id, &schema_path, &schema, &body)?);
    }
    Ok(templates)
}

fn parse_template(
    id: TemplateId,
    schema_path: &Path,
    schema: &str,
    body: &str,
) -> Result<Template, RegistryError> {
    let descriptor: SchemaDescriptor =
        serde_yaml::from_str(schema).map_err(|e| RegistryError::Parse {
            path: schema_path.to_path_buf(),
            source: e,
        })?;
    validate_fields(&id, &descriptor.fields)?;

    Ok(Template {
        definition: TemplateDefinition {
            id,
            name: descriptor.name,
            field_schema: descriptor.fields,
        },
        body: body.replace("\r\n", "\n"),
    })
}

fn validate_fields(id: &TemplateId, fields: &[FieldSpec]) -> Result<(), RegistryError> {
    for field in fields {
        match (&field.field_type, &field.sub_fields) {
            (FieldType::Repeatable, Some(subs)) => validate_fields(id, subs)?,
            (FieldType::Repeatable, None) => {}
            (_, Some(_)) => {
                return Err(RegistryError::InvalidSchema {
                    template: id.to_string(),
                    field: field.name.clone(),
                    reason: "declares sub_fields but is not repeatable",
                })
            }
            (_, None) => {}
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_template(root: &Path, id: &str, schema: &str, body: &str) {
        let dir = root.join(id);
        std::fs::create_dir_all(&dir).expect("mkdir");
        std::fs::write(dir.join(SCHEMA_FILE), schema).expect("write schema");
        std::fs::write(dir.join(BODY_FILE), body).expect("write body");
    }

    #[test]
    fn embedded_contains_classic() {
        let registry = TemplateRegistry::embedded().expect("embedded");
        let def = registry.get("classic").expect("classic");
        assert_eq!(def.id.as_str(), "classic");
        assert!(def.field_schema.iter().any(|f| f.name == "experience"));
    }

    #[test]
    fn missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let registry = TemplateRegistry::from_dir(&tmp.path().join("nope")).expect("load");
        assert!(registry.is_empty());
    }

    #[test]
    fn user_dir_overrides_embedded() {
        let tmp = TempDir::new().unwrap();
        write_template(tmp.path(), "classic", "name: Custom Classic\n", "custom body");
        let registry = TemplateRegistry::load(Some(tmp.path())).expect("load");
        let template = registry.get_template("classic").expect("classic");
        assert_eq!(template.definition.name, "Custom Classic");
        assert_eq!(template.body, "custom body");
        assert_eq!(registry.body("classic").unwrap(), "custom body");
    }

    #[test]
    fn directory_without_body_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("half");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SCHEMA_FILE), "name: Half\n").unwrap();
        let registry = TemplateRegistry::from_dir(tmp.path()).expect("load");
        assert!(registry.is_empty());
    }

    #[test]
    fn non_repeatable_with_sub_fields_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let schema = "name: Bad\nfields:\n  - name: x\n    label: X\n    type: text\n    sub_fields: []\n";
        write_template(tmp.path(), "bad", schema, "");
        let err = TemplateRegistry::from_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSchema { .. }), "got: {err}");
    }

    #[test]
    fn malformed_id_reports_not_found() {
        let registry = TemplateRegistry::embedded().unwrap();
        let err = registry.get("../classic").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[test]
    fn crlf_bodies_are_normalised() {
        let tmp = TempDir::new().unwrap();
        write_template(tmp.path(), "crlf", "name: CRLF\n", "a\r\nb\r\n");
        let registry = TemplateRegistry::from_dir(tmp.path()).unwrap();
        assert_eq!(registry.get_template("crlf").unwrap().body, "a\nb\n");
    }
}
