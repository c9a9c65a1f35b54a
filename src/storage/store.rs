//! Report persistence with merge-on-save.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::period::DateWindow;
use crate::report::{ReportLocale, merge_report_content};

use super::paths::{
    LOCK_FILE, PERIODS_DIR, parse_period_file_name, parse_week_file_name, period_report_path,
    week_report_path,
};

/// A stored weekly report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekReport {
    pub year: i32,
    pub week: u32,
    pub path: PathBuf,
}

impl WeekReport {
    pub fn filename(&self) -> String {
        file_name(&self.path)
    }
}

/// A stored report for an arbitrary period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    pub window: DateWindow,
    pub path: PathBuf,
}

impl PeriodReport {
    pub fn filename(&self) -> String {
        file_name(&self.path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Exclusive lock on the report root, released on drop.
struct StoreLock {
    _file: File,
}

impl StoreLock {
    fn acquire(root: &Path) -> Result<Self, StorageError> {
        let path = root.join(LOCK_FILE);
        let lock_err = |source| StorageError::LockFailed {
            path: path.clone(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(lock_err)?;
        file.lock_exclusive().map_err(lock_err)?;

        Ok(Self { _file: file })
    }
}

/// Reports stored under one root directory.
#[derive(Debug, Clone)]
pub struct ReportStore {
    root: PathBuf,
    locale: ReportLocale,
}

impl ReportStore {
    pub fn new(root: impl Into<PathBuf>, locale: ReportLocale) -> Self {
        Self {
            root: root.into(),
            locale,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn week_path(&self, year: i32, week: u32) -> PathBuf {
        week_report_path(&self.root, year, week)
    }

    pub fn period_path(&self, window: &DateWindow) -> PathBuf {
        period_report_path(&self.root, window)
    }

    /// Save a weekly report, merging into an existing one for the same week.
    pub fn save_week(&self, content: &str, year: i32, week: u32) -> Result<PathBuf, StorageError> {
        let path = self.week_path(year, week);
        self.save_at(&path, content)?;
        Ok(path)
    }

    /// Save a period report, merging into an existing one for the same window.
    pub fn save_period(&self, content: &str, window: &DateWindow) -> Result<PathBuf, StorageError> {
        let path = self.period_path(window);
        self.save_at(&path, content)?;
        Ok(path)
    }

    fn save_at(&self, path: &Path, content: &str) -> Result<(), StorageError> {
        create_dir(&self.root)?;
        let _lock = StoreLock::acquire(&self.root)?;

        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }

        let text = if path.exists() {
            let existing = read(path)?;
            debug!("Merging into existing report {}", path.display());
            merge_report_content(&existing, content, self.locale)
        } else if content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        write_atomic(path, &text)?;
        info!("Saved report to {}", path.display());
        Ok(())
    }

    /// Read a weekly report, if present.
    pub fn get_week(&self, year: i32, week: u32) -> Result<Option<String>, StorageError> {
        read_optional(&self.week_path(year, week))
    }

    /// Read a period report, if present.
    pub fn get_period(&self, window: &DateWindow) -> Result<Option<String>, StorageError> {
        read_optional(&self.period_path(window))
    }

    /// Delete a weekly report. Returns whether a file was removed.
    pub fn delete_week(&self, year: i32, week: u32) -> Result<bool, StorageError> {
        remove_optional(&self.week_path(year, week))
    }

    /// Delete a period report. Returns whether a file was removed.
    pub fn delete_period(&self, window: &DateWindow) -> Result<bool, StorageError> {
        remove_optional(&self.period_path(window))
    }

    /// Weekly reports, newest year and week first. Non-numeric year
    /// directories and unexpected file names are skipped.
    pub fn list_weeks(&self) -> Result<Vec<WeekReport>, StorageError> {
        let mut years: Vec<(i32, PathBuf)> = list_dir(&self.root)?
            .into_iter()
            .filter(|p| p.is_dir())
            .filter_map(|p| {
                let name = file_name(&p);
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                name.parse::<i32>().ok().map(|year| (year, p))
            })
            .collect();
        years.sort_by(|a, b| b.0.cmp(&a.0));

        let mut reports = Vec::new();
        for (year, dir) in years {
            let mut weeks: Vec<WeekReport> = list_dir(&dir)?
                .into_iter()
                .filter(|p| p.is_file())
                .filter_map(|path| {
                    parse_week_file_name(&file_name(&path)).map(|week| WeekReport {
                        year,
                        week,
                        path,
                    })
                })
                .collect();
            weeks.sort_by(|a, b| b.week.cmp(&a.week));
            reports.extend(weeks);
        }

        Ok(reports)
    }

    /// Period reports, newest start date first.
    pub fn list_periods(&self) -> Result<Vec<PeriodReport>, StorageError> {
        let mut reports: Vec<PeriodReport> = list_dir(&self.root.join(PERIODS_DIR))?
            .into_iter()
            .filter(|p| p.is_file())
            .filter_map(|path| {
                let window = parse_period_file_name(&file_name(&path))?;
                Some(PeriodReport { window, path })
            })
            .collect();
        reports.sort_by(|a, b| {
            b.window
                .start
                .cmp(&a.window.start)
                .then(b.window.end.cmp(&a.window.end))
        });
        Ok(reports)
    }
}

fn create_dir(path: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(path).map_err(|source| StorageError::CreateDirFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, StorageError> {
    fs::read_to_string(path).map_err(|source| StorageError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    read(path).map(Some)
}

fn remove_optional(path: &Path) -> Result<bool, StorageError> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path).map_err(|source| StorageError::DeleteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Entries of `dir`, or nothing when it does not exist.
fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let read_err = |source| StorageError::ReadFailed {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        paths.push(entry.map_err(read_err)?.path());
    }
    Ok(paths)
}

/// Write through a temp file in the same directory, then rename into place.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<(), StorageError> {
    let write_err = |source| StorageError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
