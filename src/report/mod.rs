//! Report documents: rendering, parsing and merging.

pub mod format;
pub mod generate;
pub mod merge;
pub mod parser;
pub mod render;

pub use format::{Document, Entry, ReportLocale, Section, dedupe_details};
pub use generate::{
    ReportOptions, build_project_entries, generate_full_report, generate_report, generate_summary,
    report_title,
};
pub use merge::{merge, merge_report_content};
pub use parser::{parse, parse_with_locale};
pub use render::{build_document, render, render_document};
