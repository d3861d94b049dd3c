//! Domain types for the template registry.
//!
//! All types are serializable/deserializable via serde; schema descriptors on
//! disk are YAML (JSON is accepted since it parses as YAML).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed template identifier.
///
/// Valid ids are non-empty and contain only ASCII alphanumerics, `-` and `_`,
/// so an id is always safe to use as a file stem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateId(String);

impl TemplateId {
    /// Returns `true` if `raw` is a well-formed template id.
    pub fn is_valid(raw: &str) -> bool {
        !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TemplateId {
    type Err = InvalidTemplateId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(InvalidTemplateId(s.to_owned()))
        }
    }
}

impl TryFrom<String> for TemplateId {
    type Error = InvalidTemplateId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidTemplateId(s))
        }
    }
}

impl From<TemplateId> for String {
    fn from(id: TemplateId) -> Self {
        id.0
    }
}

/// Rejected template id text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTemplateId(pub String);

impl fmt::Display for InvalidTemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid template id '{}'; expected ASCII letters, digits, '-' or '_'",
            self.0
        )
    }
}

impl std::error::Error for InvalidTemplateId {}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Input kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    List,
    Repeatable,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Textarea => write!(f, "textarea"),
            FieldType::List => write!(f, "list"),
            FieldType::Repeatable => write!(f, "repeatable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One entry of a template's field schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Only meaningful for [`FieldType::Repeatable`].
    #[serde(
        default,
        alias = "subFields",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_fields: Option<Vec<FieldSpec>>,
}

/// Schema descriptor as stored on disk (`schema.yaml`); the id is implied by
/// the containing directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// A published template: id, display name and ordered field schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    pub id: TemplateId,
    pub name: String,
    #[serde(rename = "fields")]
    pub field_schema: Vec<FieldSpec>,
}

/// Listing entry returned by [`crate::registry::TemplateRegistry::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: TemplateId,
    pub name: String,
}

impl From<&TemplateDefinition> for TemplateSummary {
    fn from(def: &TemplateDefinition) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_id_accepts_slug_characters() {
        let id: TemplateId = "classic_v2-alt".parse().expect("valid id");
        assert_eq!(id.to_string(), "classic_v2-alt");
    }

    #[test]
    fn template_id_rejects_path_characters() {
        assert!("../etc".parse::<TemplateId>().is_err());
        assert!("a/b".parse::<TemplateId>().is_err());
        assert!("".parse::<TemplateId>().is_err());
        assert!("with space".parse::<TemplateId>().is_err());
    }

    #[test]
    fn field_spec_accepts_camel_case_sub_fields() {
        let yaml = "name: experience\nlabel: Experience\ntype: repeatable\nsubFields:\n  - name: company\n    label: Company\n";
        let spec: FieldSpec = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(spec.field_type, FieldType::Repeatable);
        assert!(!spec.required);
        let subs = spec.sub_fields.expect("sub fields");
        assert_eq!(subs[0].field_type, FieldType::Text);
    }

    #[test]
    fn definition_serializes_schema_as_fields() {
        let def = TemplateDefinition {
            id: "classic".parse().unwrap(),
            name: "Classic".to_string(),
            field_schema: vec![],
        };
        let yaml = serde_yaml::to_string(&def).expect("serialize");
        assert!(yaml.contains("fields: []"));
        assert!(yaml.contains("id: classic"));
    }

    #[test]
    fn field_type_display() {
        assert_eq!(FieldType::Textarea.to_string(), "textarea");
        assert_eq!(FieldType::Repeatable.to_string(), "repeatable");
    }
}
