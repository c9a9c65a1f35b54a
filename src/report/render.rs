//! Report rendering.
//!
//! Output grammar:
//!
//! ```text
//! project-a
//!   - entry summary
//!     - detail
//!
//! 其他
//!   - supplement
//! ```

use std::collections::BTreeMap;

use super::format::{DETAIL_MARKER, Document, ENTRY_MARKER, Entry, ReportLocale, Section};

/// Build the document for per-project entries plus optional supplements.
///
/// Projects are visited in lexicographic order; projects with no entries are
/// left out. Blank supplements are skipped.
pub fn build_document(
    project_entries: &BTreeMap<String, Vec<Entry>>,
    supplements: &[String],
    locale: ReportLocale,
) -> Document {
    let mut doc = Document::new();

    for (project, entries) in project_entries {
        if entries.is_empty() {
            continue;
        }
        let mut section = Section::new(project.as_str());
        for entry in entries {
            section.push_entry(entry.clone());
        }
        doc.push_section(section);
    }

    let mut other = Section::new(locale.supplement_label());
    for item in supplements.iter().filter(|s| !s.trim().is_empty()) {
        other.push_entry(Entry::bullet(item.as_str()));
    }
    if !other.is_empty() {
        doc.push_section(other);
    }

    doc
}

/// Render per-project entries and supplements to report text.
///
/// Empty input renders to an empty string.
pub fn render(
    project_entries: &BTreeMap<String, Vec<Entry>>,
    supplements: &[String],
    locale: ReportLocale,
) -> String {
    render_document(&build_document(project_entries, supplements, locale))
}

/// Serialize a document: preamble verbatim, then sections separated by one
/// blank line, terminated by exactly one newline.
pub fn render_document(doc: &Document) -> String {
    let mut lines: Vec<String> = doc.preamble.clone();
    if lines.last().is_some_and(|l| !l.trim().is_empty()) {
        lines.push(String::new());
    }

    for section in doc.sections() {
        lines.push(section.label().to_string());
        for entry in section.entries() {
            lines.push(format!("{}{}", ENTRY_MARKER, entry.summary()));
            for detail in entry.details() {
                lines.push(format!("{}{}", DETAIL_MARKER, detail));
            }
        }
        lines.push(String::new());
    }

    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

impl Document {
    /// Serialize to report text. See [`render_document`].
    pub fn to_text(&self) -> String {
        render_document(self)
    }
}
