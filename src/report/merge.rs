//! Merging a freshly generated report into a previously stored one.
//!
//! Regenerating a report for the same period must be additive: manual edits in
//! the stored file survive, and new commits are folded in without repeating
//! summaries that are already recorded.

use super::format::{Document, Entry, ReportLocale, Section};
use super::parser::parse_with_locale;
use super::render::render_document;

/// Merge `incoming` into `existing`.
///
/// - The existing preamble wins unless it is empty.
/// - Existing sections keep their order; new sections are appended.
/// - Entries match by exact summary. A match gains the incoming details it
///   lacks; anything else is appended to its section.
pub fn merge(existing: &Document, incoming: &Document) -> Document {
    let preamble = if existing.preamble.is_empty() {
        incoming.preamble.clone()
    } else {
        existing.preamble.clone()
    };

    let mut merged = existing.clone();
    merged.preamble = preamble;

    for section in incoming.sections() {
        merged.push_section(section.clone());
    }

    normalize(merged)
}

/// Rebuild every section and entry through the checked constructors so that
/// summaries are unique per section and details are trimmed and unique.
pub fn normalize(doc: Document) -> Document {
    let mut out = Document::with_preamble(doc.preamble.clone());
    for section in doc.sections() {
        let mut rebuilt = Section::new(section.label());
        for entry in section.entries() {
            rebuilt.push_entry(Entry::new(entry.summary(), entry.details()));
        }
        out.push_section(rebuilt);
    }
    out
}

/// Text-level merge: parse both reports, merge, and render the result.
pub fn merge_report_content(existing: &str, incoming: &str, locale: ReportLocale) -> String {
    let existing = parse_with_locale(existing, locale);
    let incoming = parse_with_locale(incoming, locale);
    render_document(&merge(&existing, &incoming))
}
