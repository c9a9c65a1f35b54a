//! Lenient parsing of stored report text back into a [`Document`].
//!
//! Stored reports are often edited by hand, so the parser never fails: lines
//! it does not recognise are either absorbed into the open entry or dropped.

use tracing::debug;

use super::format::{DETAIL_MARKER, Document, ENTRY_MARKER, Entry, ReportLocale};

/// Heading marker for title lines kept in the preamble.
const HEADING_MARKER: char = '#';

/// Shape of one input line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Heading(&'a str),
    Label(&'a str),
    Entry(&'a str),
    Detail(&'a str),
    /// Indented text with no recognised marker.
    Unrecognized(&'a str),
}

fn classify_line(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if let Some(rest) = line.strip_prefix(DETAIL_MARKER) {
        return Line::Detail(rest.trim());
    }
    if let Some(rest) = line.strip_prefix(ENTRY_MARKER) {
        return Line::Entry(rest.trim());
    }
    if line.starts_with(char::is_whitespace) {
        return Line::Unrecognized(line.trim());
    }
    if line.starts_with(HEADING_MARKER) {
        return Line::Heading(line);
    }
    Line::Label(line.trim())
}

/// Parse report text using the default locale's supplementary label.
pub fn parse(text: &str) -> Document {
    parse_with_locale(text, ReportLocale::default())
}

/// Parse report text. Entries found before any section label go to the
/// locale's supplementary section.
pub fn parse_with_locale(text: &str, locale: ReportLocale) -> Document {
    let mut doc = Document::new();
    let mut preamble: Vec<String> = Vec::new();
    let mut started = false;
    let mut current_section: Option<usize> = None;
    let mut current_entry: Option<(usize, usize)> = None;

    for raw_line in text.lines() {
        match classify_line(raw_line) {
            Line::Blank => {
                if !started {
                    preamble.push(raw_line.to_string());
                }
            }
            Line::Heading(line) if !started => preamble.push(line.to_string()),
            Line::Heading(label) | Line::Label(label) => {
                started = true;
                current_section = Some(doc.open_section(label.trim()));
                current_entry = None;
            }
            Line::Entry(summary) => {
                started = true;
                let section_idx = *current_section
                    .get_or_insert_with(|| doc.open_section(locale.supplement_label()));
                current_entry = doc
                    .section_mut(section_idx)
                    .map(|section| (section_idx, section.push_entry(Entry::bullet(summary))));
            }
            Line::Detail(detail) => match current_entry {
                Some(target) => append_detail(&mut doc, target, detail),
                None => debug!("Dropping detail line outside any entry: {:?}", detail),
            },
            Line::Unrecognized(content) => match current_entry {
                Some(target) => absorb_malformed_line(&mut doc, target, content),
                None => debug!("Dropping unrecognized line: {:?}", content),
            },
        }
    }

    doc.preamble = preamble;
    doc
}

fn append_detail(doc: &mut Document, (section, entry): (usize, usize), detail: &str) {
    if let Some(entry) = doc.section_mut(section).and_then(|s| s.entry_mut(entry)) {
        entry.push_detail(detail);
    }
}

/// Recovery for hand-edited files: indented text with an unexpected marker or
/// indentation is kept as a detail of the entry it follows.
fn absorb_malformed_line(doc: &mut Document, target: (usize, usize), content: &str) {
    append_detail(doc, target, content);
}
