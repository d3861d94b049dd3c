//! Plain-text rendition derived directly from the unsanitized model.
//!
//! Independent of the expansion engine: no template body is involved and no
//! escaping is applied.

use crate::model::{CanonicalDataModel, EducationEntry, ExperienceEntry, ProjectEntry};

const CONTACT_SEPARATOR: &str = " | ";
const BULLET: &str = "  - ";

/// Render the line-oriented text summary of `model`.
///
/// The two header lines are always present; every later section appears only
/// when its data is non-empty, separated by one blank line.
pub fn summarize(model: &CanonicalDataModel) -> String {
    let mut sections: Vec<Vec<String>> = Vec::new();

    sections.push(vec![model.full_name.clone(), contact_line(model)]);

    if !model.summary.is_empty() {
        sections.push(vec!["SUMMARY".to_string(), model.summary.clone()]);
    }
    if !model.education.is_empty() {
        let mut lines = vec!["EDUCATION".to_string()];
        model.education.iter().for_each(|e| education_lines(e, &mut lines));
        sections.push(lines);
    }
    if !model.experience.is_empty() {
        let mut lines = vec!["WORK EXPERIENCE".to_string()];
        model.experience.iter().for_each(|e| experience_lines(e, &mut lines));
        sections.push(lines);
    }
    if !model.projects.is_empty() {
        let mut lines = vec!["PROJECTS".to_string()];
        model.projects.iter().for_each(|p| project_lines(p, &mut lines));
        sections.push(lines);
    }

    let skills: Vec<String> = [
        ("Expert", &model.skills_expert),
        ("Proficient", &model.skills_proficient),
        ("Familiar", &model.skills_familiar),
        ("Languages", &model.languages),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(label, value)| format!("{label}: {value}"))
    .collect();
    if !skills.is_empty() {
        let mut lines = vec!["SKILLS".to_string()];
        lines.extend(skills);
        sections.push(lines);
    }

    let mut out = sections
        .into_iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}

fn contact_line(model: &CanonicalDataModel) -> String {
    let website = if model.website_display.is_empty() {
        &model.website
    } else {
        &model.website_display
    };
    [&model.location, &model.phone, &model.email, website]
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(CONTACT_SEPARATOR)
}

/// `a, b (c)` with empty parts dropped.
fn heading(parts: &[&str], trailer: &str) -> String {
    let mut line = parts
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if !trailer.is_empty() {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&format!("({trailer})"));
    }
    line
}

/// Adds `line` unless every part of the heading was empty.
fn push_heading(lines: &mut Vec<String>, line: String) {
    if !line.is_empty() {
        lines.push(line);
    }
}

fn education_lines(entry: &EducationEntry, lines: &mut Vec<String>) {
    push_heading(lines, heading(&[entry.degree.as_str(), entry.institute.as_str()], &entry.year));
    if !entry.location.is_empty() {
        lines.push(format!("  {}", entry.location));
    }
    if !entry.coursework.is_empty() {
        lines.push(format!("  Coursework: {}", entry.coursework));
    }
}

fn experience_lines(entry: &ExperienceEntry, lines: &mut Vec<String>) {
    push_heading(lines, heading(&[entry.role.as_str(), entry.company.as_str()], &entry.duration));
    if !entry.location.is_empty() {
        lines.push(format!("  {}", entry.location));
    }
    lines.extend(entry.points.iter().map(|p| format!("{BULLET}{p}")));
}

fn project_lines(entry: &ProjectEntry, lines: &mut Vec<String>) {
    push_heading(lines, heading(&[entry.name.as_str()], &entry.date));
    lines.extend(entry.points.iter().map(|p| format!("{BULLET}{p}")));
}
