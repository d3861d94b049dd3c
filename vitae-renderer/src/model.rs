//! Canonical data model: the fully-defaulted shape every template renders from.
//!
//! [`CanonicalDataModel::build`] absorbs partial or malformed submissions
//! instead of rejecting them:
//! - missing scalars become `""`, never null;
//! - `education` holds at most one synthesized entry;
//! - blank `points` entries are dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RenderError;

/// Raw inputs that feed the single education slot.
const EDUCATION_KEYS: [&str; 5] = [
    "edu_institute",
    "edu_location",
    "edu_degree",
    "edu_year",
    "edu_coursework",
];

/// Normalized rendering payload built fresh for every render call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalDataModel {
    pub full_name: String,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub website_display: String,
    pub summary: String,
    pub skills_expert: String,
    pub skills_proficient: String,
    pub skills_familiar: String,
    pub languages: String,
    /// Zero or one entry.
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institute: String,
    pub location: String,
    pub degree: String,
    pub year: String,
    pub coursework: String,
    /// `coursework` as a list of zero or one item, so a template can drop the
    /// coursework bullet entirely when it is empty.
    pub coursework_items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub location: String,
    pub role: String,
    pub duration: String,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub date: String,
    pub points: Vec<String>,
}

impl CanonicalDataModel {
    /// Normalize a raw submission. Unknown fields are ignored; a non-object
    /// submission is treated as empty.
    pub fn build(submission: &Value) -> Self {
        let empty = Map::new();
        let fields = submission.as_object().unwrap_or(&empty);

        let mut education = EducationEntry {
            institute: scalar(fields, "edu_institute"),
            location: scalar(fields, "edu_location"),
            degree: scalar(fields, "edu_degree"),
            year: scalar(fields, "edu_year"),
            coursework: scalar(fields, "edu_coursework"),
            coursework_items: Vec::new(),
        };
        if !education.coursework.trim().is_empty() {
            education.coursework_items.push(education.coursework.clone());
        }
        let has_education = EDUCATION_KEYS
            .iter()
            .any(|key| !scalar(fields, key).is_empty());

        let model = CanonicalDataModel {
            full_name: scalar(fields, "full_name"),
            location: scalar(fields, "location"),
            phone: scalar(fields, "phone"),
            email: scalar(fields, "email"),
            website: scalar(fields, "website"),
            website_display: scalar(fields, "website_display"),
            summary: scalar(fields, "summary"),
            skills_expert: scalar(fields, "skills_expert"),
            skills_proficient: scalar(fields, "skills_proficient"),
            skills_familiar: scalar(fields, "skills_familiar"),
            languages: scalar(fields, "languages"),
            education: if has_education { vec![education] } else { vec![] },
            experience: groups(fields, "experience")
                .map(|g| ExperienceEntry {
                    company: scalar(g, "company"),
                    location: scalar(g, "location"),
                    role: scalar(g, "role"),
                    duration: scalar(g, "duration"),
                    points: points(g),
                })
                .collect(),
            projects: groups(fields, "projects")
                .map(|g| ProjectEntry {
                    name: scalar(g, "name"),
                    date: scalar(g, "date"),
                    points: points(g),
                })
                .collect(),
        };
        tracing::debug!(
            education = model.education.len(),
            experience = model.experience.len(),
            projects = model.projects.len(),
            "built data model"
        );
        model
    }

    /// Generic value tree used by the sanitizer and expansion engine.
    pub fn to_value(&self) -> Result<Value, RenderError> {
        serde_json::to_value(self).map_err(RenderError::from)
    }
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

/// Loose scalar coercion: strings verbatim, numbers/bools in display form,
/// string lists joined with `", "`, everything else empty.
fn scalar(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn groups<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> + 'a {
    fields
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// `points` as a list of strings, or a newline-separated textarea value.
/// Entries that are blank after trimming are dropped; survivors are kept verbatim.
fn points(group: &Map<String, Value>) -> Vec<String> {
    let raw: Vec<String> = match group.get("points") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.lines().map(str::to_string).collect(),
        _ => vec![],
    };
    raw.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
