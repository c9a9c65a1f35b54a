//! End-to-end report generation from raw commits.

use std::collections::BTreeMap;

use tracing::debug;

use crate::commit::{ClassifiedCommit, DEFAULT_SUMMARY_MAX_LEN, merge_related};
use crate::git::RawCommit;

use super::format::{Document, Entry, ReportLocale};
use super::render::render;

/// Knobs for report generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub summary_max_len: usize,
    pub locale: ReportLocale,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            summary_max_len: DEFAULT_SUMMARY_MAX_LEN,
            locale: ReportLocale::default(),
        }
    }
}

/// Drop commits judged trivial.
pub fn filter_trivial_commits(commits: Vec<ClassifiedCommit>) -> Vec<ClassifiedCommit> {
    let before = commits.len();
    let kept: Vec<ClassifiedCommit> = commits.into_iter().filter(|c| !c.is_trivial).collect();
    debug!("Filtered {} trivial commits", before - kept.len());
    kept
}

/// Bucket commits by project, keeping each project's commit order.
pub fn group_by_project(
    commits: Vec<ClassifiedCommit>,
) -> BTreeMap<String, Vec<ClassifiedCommit>> {
    let mut grouped: BTreeMap<String, Vec<ClassifiedCommit>> = BTreeMap::new();
    for commit in commits {
        grouped
            .entry(commit.project().to_string())
            .or_default()
            .push(commit);
    }
    grouped
}

/// Classify, filter and merge raw commits into entries per project.
pub fn build_project_entries(
    commits: &[RawCommit],
    options: &ReportOptions,
) -> BTreeMap<String, Vec<Entry>> {
    let classified: Vec<ClassifiedCommit> =
        commits.iter().cloned().map(ClassifiedCommit::new).collect();

    group_by_project(filter_trivial_commits(classified))
        .into_iter()
        .map(|(project, commits)| {
            let entries = merge_related(&commits, options.summary_max_len);
            (project, entries)
        })
        .collect()
}

/// Generate report text from raw commits and supplementary bullets.
///
/// Returns an empty string when there is nothing to report.
pub fn generate_report(
    commits: &[RawCommit],
    supplements: &[String],
    options: &ReportOptions,
) -> String {
    if commits.is_empty() && supplements.is_empty() {
        return String::new();
    }
    let project_entries = build_project_entries(commits, options);
    render(&project_entries, supplements, options.locale)
}

/// Generate the report with a title line such as `# 周报 (2024-01-01 ~ 2024-01-07)`.
///
/// The title is only added when the body is non-empty.
pub fn generate_full_report(
    commits: &[RawCommit],
    supplements: &[String],
    date_range: Option<&str>,
    options: &ReportOptions,
) -> String {
    let body = generate_report(commits, supplements, options);
    match date_range {
        Some(range) if !body.is_empty() => {
            format!("{}\n\n{}", report_title(options.locale, range), body)
        }
        _ => body,
    }
}

/// Heading line for a report covering `date_range`.
pub fn report_title(locale: ReportLocale, date_range: &str) -> String {
    format!("# {} ({})", locale.title(), date_range)
}

/// One-line description of a document for CLI output.
pub fn generate_summary(doc: &Document) -> String {
    let sections = doc.sections().len();
    let entries = doc.entry_count();

    if entries == 0 {
        return "Report is empty.".to_string();
    }

    let section_word = if sections == 1 { "section" } else { "sections" };
    let entry_word = if entries == 1 { "entry" } else { "entries" };
    format!("{} {} across {} {}", entries, entry_word, sections, section_word)
}
