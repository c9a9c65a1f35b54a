//! Structured report types.
//!
//! A report file is a [`Document`]: a verbatim preamble followed by ordered
//! [`Section`]s, each holding [`Entry`] bullets with nested detail lines.

use serde::{Deserialize, Serialize};

/// Bullet marker for an entry line.
pub const ENTRY_MARKER: &str = "  - ";

/// Bullet marker for a detail line.
pub const DETAIL_MARKER: &str = "    - ";

/// Language of the fixed report strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLocale {
    #[default]
    Zh,
    En,
}

impl ReportLocale {
    /// Label of the section holding manually supplied bullets.
    pub fn supplement_label(&self) -> &'static str {
        match self {
            Self::Zh => "其他",
            Self::En => "Other",
        }
    }

    /// Title word used in the report heading.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Zh => "周报",
            Self::En => "Weekly Report",
        }
    }
}

impl std::str::FromStr for ReportLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zh" | "cn" | "zh-cn" => Ok(Self::Zh),
            "en" | "en-us" => Ok(Self::En),
            _ => Err(format!("Unknown locale: {}", s)),
        }
    }
}

/// Collapse `text` onto one line: each run of line breaks becomes a single
/// space and the pieces are trimmed.
fn one_line(text: &str) -> String {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fold every item onto one line and drop empty or repeated ones, keeping
/// first-seen order.
pub fn dedupe_details<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result: Vec<String> = Vec::new();
    for item in items {
        let folded = one_line(item.as_ref());
        if folded.is_empty() || result.contains(&folded) {
            continue;
        }
        result.push(folded);
    }
    result
}

/// One bullet: a unit of work, possibly merged from several commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    summary: String,
    details: Vec<String>,
}

impl Entry {
    /// Create an entry. The summary is folded onto one trimmed line; details
    /// are folded the same way and de-duplicated.
    pub fn new<I, S>(summary: impl Into<String>, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let summary: String = summary.into();
        Self {
            summary: one_line(&summary),
            details: dedupe_details(details),
        }
    }

    /// Entry with no nested details.
    pub fn bullet(summary: impl Into<String>) -> Self {
        Self::new(summary, Vec::<String>::new())
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Append one detail unless it is blank or already present.
    pub fn push_detail(&mut self, detail: &str) {
        let folded = one_line(detail);
        if folded.is_empty() || self.details.contains(&folded) {
            return;
        }
        self.details.push(folded);
    }

    /// Append every detail of `other` that this entry lacks.
    pub fn extend_details<'a, I>(&mut self, details: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for detail in details {
            self.push_detail(detail);
        }
    }
}

/// A labelled group of entries (a project, or the supplementary bucket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    label: String,
    entries: Vec<Entry>,
}

impl Section {
    pub fn new(label: impl Into<String>) -> Self {
        let label: String = label.into();
        Self {
            label: one_line(&label),
            entries: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an entry, keeping summaries unique. An entry whose summary is
    /// already present only contributes its new details. Returns the index
    /// of the entry that now holds the content.
    pub fn push_entry(&mut self, entry: Entry) -> usize {
        if let Some(idx) = self.position(entry.summary()) {
            self.entries[idx].extend_details(entry.details());
            return idx;
        }
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub fn find(&self, summary: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.summary == summary)
    }

    pub(crate) fn entry_mut(&mut self, idx: usize) -> Option<&mut Entry> {
        self.entries.get_mut(idx)
    }

    fn position(&self, summary: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.summary == summary)
    }
}

/// Full structured form of one report file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub preamble: Vec<String>,
    sections: Vec<Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preamble(preamble: Vec<String>) -> Self {
        Self {
            preamble,
            sections: Vec::new(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, label: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.label == label)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.preamble.iter().all(|l| l.trim().is_empty())
    }

    /// Return the index of the section with `label`, appending a new empty
    /// one at the end when absent.
    pub fn open_section(&mut self, label: &str) -> usize {
        let label = one_line(label);
        if let Some(idx) = self.sections.iter().position(|s| s.label == label) {
            return idx;
        }
        self.sections.push(Section::new(label));
        self.sections.len() - 1
    }

    /// Add a whole section. An existing section with the same label absorbs
    /// the entries instead, keeping its position.
    pub fn push_section(&mut self, section: Section) {
        let idx = self.open_section(&section.label);
        for entry in section.entries {
            self.sections[idx].push_entry(entry);
        }
    }

    pub(crate) fn section_mut(&mut self, idx: usize) -> Option<&mut Section> {
        self.sections.get_mut(idx)
    }

    /// Count entries across every section.
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }
}
