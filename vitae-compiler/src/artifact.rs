//! Output formats and the artifacts a render call returns.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const CONTENT_TYPE_SOURCE: &str = "application/x-tex";
pub const CONTENT_TYPE_SUMMARY: &str = "text/plain; charset=utf-8";
pub const CONTENT_TYPE_PDF: &str = "application/pdf";

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// Requested output format. The compiled PDF is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Source,
    Summary,
    #[default]
    Pdf,
}

impl Format {
    /// Lenient parse of an optional query value; unknown or absent means [`Format::Pdf`].
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.map(|s| s.parse::<Format>().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Source => "tex",
            Format::Summary => "txt",
            Format::Pdf => "pdf",
        }
    }
}

impl FromStr for Format {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "source" | "tex" => Format::Source,
            "summary" | "text" | "txt" => Format::Summary,
            _ => Format::Pdf,
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Source => write!(f, "source"),
            Format::Summary => write!(f, "summary"),
            Format::Pdf => write!(f, "pdf"),
        }
    }
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// Result of a render call: text or binary content plus its HTTP-facing metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Source {
        text: String,
        content_type: &'static str,
        filename: String,
    },
    Binary {
        bytes: Vec<u8>,
        content_type: &'static str,
        filename: String,
    },
}

impl Artifact {
    /// Raw LaTeX markup, `<stem>.tex`.
    pub fn source(stem: &str, text: String) -> Self {
        Artifact::Source {
            text,
            content_type: CONTENT_TYPE_SOURCE,
            filename: format!("{stem}.{}", Format::Source.extension()),
        }
    }

    /// Plain-text summary, `<stem>.txt`.
    pub fn summary(stem: &str, text: String) -> Self {
        Artifact::Source {
            text,
            content_type: CONTENT_TYPE_SUMMARY,
            filename: format!("{stem}.{}", Format::Summary.extension()),
        }
    }

    /// Compiled PDF, `<stem>.pdf`.
    pub fn pdf(stem: &str, bytes: Vec<u8>) -> Self {
        Artifact::Binary {
            bytes,
            content_type: CONTENT_TYPE_PDF,
            filename: format!("{stem}.{}", Format::Pdf.extension()),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Artifact::Source { content_type, .. } | Artifact::Binary { content_type, .. } => {
                *content_type
            }
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            Artifact::Source { filename, .. } | Artifact::Binary { filename, .. } => filename,
        }
    }

    pub fn body(&self) -> &[u8] {
        match self {
            Artifact::Source { text, .. } => text.as_bytes(),
            Artifact::Binary { bytes, .. } => bytes,
        }
    }

    /// `attachment; filename="<id>.<ext>"`
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename())
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Artifact::Binary { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("source"), Format::Source)]
    #[case(Some("TEX"), Format::Source)]
    #[case(Some("summary"), Format::Summary)]
    #[case(Some("txt"), Format::Summary)]
    #[case(Some("pdf"), Format::Pdf)]
    #[case(Some("docx"), Format::Pdf)]
    #[case(None, Format::Pdf)]
    fn lenient_format_parsing(#[case] raw: Option<&str>, #[case] expected: Format) {
        assert_eq!(Format::from_query(raw), expected);
    }

    #[test]
    fn source_artifact_metadata() {
        let artifact = Artifact::source("classic", "\\documentclass{article}".to_string());
        assert_eq!(artifact.content_type(), "application/x-tex");
        assert_eq!(artifact.filename(), "classic.tex");
        assert_eq!(
            artifact.content_disposition(),
            "attachment; filename=\"classic.tex\""
        );
        assert!(!artifact.is_binary());
    }

    #[test]
    fn summary_is_a_text_artifact() {
        let artifact = Artifact::summary("classic", "Ada\n".to_string());
        assert_eq!(artifact.content_type(), "text/plain; charset=utf-8");
        assert_eq!(artifact.filename(), "classic.txt");
        assert_eq!(artifact.body(), b"Ada\n");
    }

    #[test]
    fn pdf_is_binary() {
        let artifact = Artifact::pdf("classic", b"%PDF-1.5".to_vec());
        assert!(artifact.is_binary());
        assert_eq!(artifact.content_type(), "application/pdf");
        assert_eq!(artifact.filename(), "classic.pdf");
    }

    #[test]
    fn format_display_round_trips_through_parse() {
        for format in [Format::Source, Format::Summary, Format::Pdf] {
            assert_eq!(Format::from_query(Some(&format.to_string())), format);
        }
    }
}
