//! LaTeX-safe escaping of every leaf string in the model.

use serde_json::Value;

use crate::error::RenderError;
use crate::model::CanonicalDataModel;

/// Replacements in application order. The backslash rule must stay first so the
/// backslashes introduced by the later rules are not escaped again.
const ESCAPES: &[(&str, &str)] = &[
    ("\\", "\\\\"),
    ("#", "\\#"),
    ("%", "\\%"),
    ("&", "\\&"),
    ("_", "\\_"),
    ("{", "\\{"),
    ("}", "\\}"),
    ("^", "\\^{}"),
    ("~", "\\~{}"),
];

/// The canonical model with every leaf string escaped. Same structure, same keys.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedModel(Value);

impl SanitizedModel {
    pub fn from_model(model: &CanonicalDataModel) -> Result<Self, RenderError> {
        Ok(Self(sanitize(&model.to_value()?)))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Escape one string for embedding in LaTeX markup.
pub fn escape(input: &str) -> String {
    ESCAPES
        .iter()
        .fold(input.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Recursive structural walk; only string leaves change.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(escape(s)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), sanitize(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn backslash_is_escaped_once_before_other_rules() {
        assert_eq!(escape(r"50% \_test"), r"50\% \\\_test");
    }

    #[rstest]
    #[case("#", r"\#")]
    #[case("%", r"\%")]
    #[case("&", r"\&")]
    #[case("_", r"\_")]
    #[case("{", r"\{")]
    #[case("}", r"\}")]
    #[case("^", r"\^{}")]
    #[case("~", r"\~{}")]
    #[case(r"\", r"\\")]
    #[case("plain text", "plain text")]
    fn single_character_rules(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[test]
    fn caret_and_tilde_braces_are_not_re_escaped() {
        assert_eq!(escape("a^b~c"), r"a\^{}b\~{}c");
    }

    #[test]
    fn structure_and_non_strings_are_preserved() {
        let input = json!({
            "name": "R&D",
            "count": 3,
            "flag": true,
            "missing": null,
            "items": [{ "x": "100%" }, "a_b", []]
        });
        let out = sanitize(&input);
        assert_eq!(
            out,
            json!({
                "name": r"R\&D",
                "count": 3,
                "flag": true,
                "missing": null,
                "items": [{ "x": r"100\%" }, r"a\_b", []]
            })
        );
    }

    #[test]
    fn sanitized_model_keeps_array_lengths() {
        let model = CanonicalDataModel::build(&json!({
            "full_name": "Jo_e",
            "experience": [{ "company": "A&B", "points": ["x", "y#"] }]
        }));
        let sanitized = SanitizedModel::from_model(&model).unwrap();
        let value = sanitized.as_value();
        assert_eq!(value["full_name"], json!(r"Jo\_e"));
        assert_eq!(value["experience"][0]["points"], json!(["x", r"y\#"]));
        assert_eq!(value["education"], json!([]));
    }
}
