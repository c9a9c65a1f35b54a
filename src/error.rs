//! Error types for weekly-report modules using thiserror.
//!
//! The report engine itself (classification, grouping, rendering, parsing and
//! merging) is total and has no error type. These enums cover the collaborators
//! around it.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository at {path}: {source}")]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("Failed to read commit: {0}")]
    ParseCommit(#[source] git2::Error),

    #[error("Background git task failed: {0}")]
    TaskFailed(String),
}

/// Errors from the configuration file and repository registry.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to write config {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Not a git repository: {0}")]
    NotAGitRepository(PathBuf),

    #[error("Repository '{0}' is not registered")]
    UnknownRepository(String),

    #[error("Could not determine home directory; set WEEKLY_REPORT_HOME or pass --base-dir")]
    NoHomeDirectory,
}

/// Errors from report persistence.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read report {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to lock report store at {path}: {source}")]
    LockFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete report {path}: {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from date window validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("开始日期不能晚于结束日期 (start {start} is after end {end})")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[error("不能选择未来日期 (end {end} is after today {today})")]
    FutureDate { end: NaiveDate, today: NaiveDate },

    #[error("开始日期必须是周一 ({0} is not a Monday)")]
    StartNotMonday(NaiveDate),

    #[error("Invalid timezone offset: {0} hours")]
    InvalidOffset(i32),

    #[error("Week offset {0} is outside the supported calendar")]
    WeekOffsetOutOfRange(i64),
}
