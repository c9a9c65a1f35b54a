//! The `index.md` overview of stored weekly reports.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::StorageError;

use super::paths::INDEX_FILE;
use super::store::{ReportStore, WeekReport, write_atomic};

/// Render the index for `reports` (expected newest first).
pub fn render_index(reports: &[WeekReport]) -> String {
    let mut by_year: BTreeMap<i32, Vec<&WeekReport>> = BTreeMap::new();
    for report in reports {
        by_year.entry(report.year).or_default().push(report);
    }

    let mut lines = vec!["# 周报索引\n".to_string()];

    for (year, reports) in by_year.iter().rev() {
        lines.push(format!("\n## {} 年\n", year));
        for report in reports {
            lines.push(format!(
                "- [第 {} 周](./{}/{})",
                report.week,
                year,
                report.filename()
            ));
        }
    }

    if reports.is_empty() {
        lines.push("\n暂无周报记录。\n".to_string());
    }

    lines.join("\n")
}

impl ReportStore {
    /// Rewrite `<root>/index.md` from the stored weekly reports.
    pub fn update_index(&self) -> Result<PathBuf, StorageError> {
        std::fs::create_dir_all(self.root()).map_err(|source| StorageError::CreateDirFailed {
            path: self.root().to_path_buf(),
            source,
        })?;

        let reports = self.list_weeks()?;
        let path = self.root().join(INDEX_FILE);
        write_atomic(&path, &render_index(&reports))?;
        Ok(path)
    }
}
