//! Registry loading, lookup and error-message integration tests.

use assert_fs::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use vitae_core::{FieldType, RegistryError, TemplateRegistry};

fn fixture_dir() -> assert_fs::TempDir {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("letter/schema.yaml")
        .write_str(
            "name: Cover Letter\nfields:\n  - name: full_name\n    label: Name\n    type: text\n    required: true\n  - name: body\n    label: Body\n    type: textarea\n",
        )
        .expect("write schema");
    dir.child("letter/template.tex")
        .write_str("Dear reader, {{ body }} -- {{ full_name }}")
        .expect("write body");
    dir.child("memo/schema.json")
        .write_str(r#"{"name": "Memo", "fields": [{"name": "items", "label": "Items", "type": "repeatable", "subFields": [{"name": "text", "label": "Text"}]}]}"#)
        .expect("write json schema");
    dir.child("memo/template.tex")
        .write_str("{{#each items}}{{ text }}{{/each}}")
        .expect("write body");
    dir
}

// ---------------------------------------------------------------------------
// 1. Lookup
// ---------------------------------------------------------------------------

#[test]
fn from_dir_lists_templates_sorted_by_id() {
    let dir = fixture_dir();
    let registry = TemplateRegistry::from_dir(dir.path()).expect("load");
    let ids: Vec<_> = registry.list().into_iter().map(|s| s.id.to_string()).collect();
    assert_eq!(ids, vec!["letter", "memo"]);
    assert_eq!(registry.list()[0].name, "Cover Letter");
}

#[test]
fn json_schema_descriptor_is_accepted() {
    let dir = fixture_dir();
    let registry = TemplateRegistry::from_dir(dir.path()).expect("load");
    let memo = registry.get("memo").expect("memo");
    assert_eq!(memo.field_schema[0].field_type, FieldType::Repeatable);
    assert_eq!(
        memo.field_schema[0].sub_fields.as_ref().map(Vec::len),
        Some(1)
    );
}

#[test]
fn schema_field_order_is_preserved() {
    let dir = fixture_dir();
    let registry = TemplateRegistry::from_dir(dir.path()).expect("load");
    let names: Vec<_> = registry
        .get("letter")
        .expect("letter")
        .field_schema
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["full_name", "body"]);
}

#[test]
fn load_overlays_user_templates_on_embedded() {
    let dir = fixture_dir();
    let registry = TemplateRegistry::load(Some(dir.path())).expect("load");
    assert_eq!(registry.len(), 3);
    assert!(registry.get("classic").is_ok());
    assert!(registry.get("letter").is_ok());
}

// ---------------------------------------------------------------------------
// 2. NotFound
// ---------------------------------------------------------------------------

#[rstest]
#[case("nonexistent")]
#[case("../letter")]
#[case("")]
#[case("letter/template.tex")]
fn unknown_ids_report_not_found(#[case] id: &str) {
    let dir = fixture_dir();
    let registry = TemplateRegistry::from_dir(dir.path()).expect("load");
    let err = registry.get(id).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }), "got: {err}");
    assert!(registry.get_template(id).is_err());
}

#[test]
fn not_found_message_names_the_id() {
    let registry = TemplateRegistry::embedded().expect("embedded");
    let err = registry.get("resume-2099").unwrap_err();
    assert!(predicate::str::contains("resume-2099").eval(&err.to_string()));
}

// ---------------------------------------------------------------------------
// 3. Parse errors
// ---------------------------------------------------------------------------

#[test]
fn corrupt_schema_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("broken/schema.yaml")
        .write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");
    dir.child("broken/template.tex").write_str("").expect("write");

    let err = TemplateRegistry::from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, RegistryError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("schema.yaml"));
}

#[test]
fn invalid_directory_names_are_skipped() {
    let dir = fixture_dir();
    dir.child("has space/schema.yaml")
        .write_str("name: Nope\n")
        .expect("write");
    dir.child("has space/template.tex").write_str("").expect("write");

    let registry = TemplateRegistry::from_dir(dir.path()).expect("load");
    assert_eq!(registry.len(), 2);
}
