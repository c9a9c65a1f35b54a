//! Report file locations.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::period::DateWindow;

pub const PERIODS_DIR: &str = "periods";
pub const INDEX_FILE: &str = "index.md";
pub const LOCK_FILE: &str = ".lock";

/// `<root>/<year>/week-<WW>.md`
pub fn week_report_path(root: &Path, year: i32, week: u32) -> PathBuf {
    root.join(year.to_string()).join(format!("week-{:02}.md", week))
}

/// `<root>/periods/<start>_to_<end>.md`
pub fn period_report_path(root: &Path, window: &DateWindow) -> PathBuf {
    root.join(PERIODS_DIR)
        .join(format!("{}_to_{}.md", window.start, window.end))
}

/// Week number from a `week-NN.md` file name.
pub fn parse_week_file_name(name: &str) -> Option<u32> {
    name.strip_prefix("week-")?.strip_suffix(".md")?.parse().ok()
}

/// Date window from a `<start>_to_<end>.md` file name.
pub fn parse_period_file_name(name: &str) -> Option<DateWindow> {
    let stem = name.strip_suffix(".md")?;
    let (start, end) = stem.split_once("_to_")?;
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(end, "%Y-%m-%d").ok()?;
    DateWindow::new(start, end).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_report_path() {
        let path = week_report_path(Path::new("/r"), 2024, 3);
        assert_eq!(path, PathBuf::from("/r/2024/week-03.md"));
    }

    #[test]
    fn test_period_report_path() {
        let window = DateWindow::new(
            NaiveDate::from_ymd_opt(2025, 7, 13).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(),
        )
        .unwrap();
        let path = period_report_path(Path::new("/r"), &window);
        assert_eq!(path, PathBuf::from("/r/periods/2025-07-13_to_2026-01-13.md"));
    }

    #[test]
    fn test_parse_file_names() {
        assert_eq!(parse_week_file_name("week-07.md"), Some(7));
        assert_eq!(parse_week_file_name("week-xx.md"), None);
        assert_eq!(parse_week_file_name("notes.md"), None);

        let window = parse_period_file_name("2024-01-01_to_2024-06-30.md").unwrap();
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert!(parse_period_file_name("2024-13-01_to_2024-06-30.md").is_none());
        assert!(parse_period_file_name("2024-06-30_to_2024-01-01.md").is_none());
    }
}
