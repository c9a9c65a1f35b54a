//! weekly-report - A CLI tool that turns git history into weekly activity reports.
//!
//! # Overview
//!
//! weekly-report reads commits from registered repositories, drops trivial ones
//! (typos, merges, formatting), merges related commits into one bullet per unit
//! of work, and writes a plain-text report per week or period. Regenerating a
//! report for a period that is already stored merges the new content into the
//! file, so hand-written additions survive.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod period;
pub mod report;
pub mod storage;

// Re-export commonly used types
pub use commit::{Classification, ClassifiedCommit, classify, merge_related};
pub use config::{Config, RepoEntry};
pub use error::{ConfigError, GitError, PeriodError, StorageError};
pub use git::{AuthorFilter, AuthorMode, RawCommit};
pub use period::DateWindow;
pub use report::{Document, Entry, ReportLocale, ReportOptions, Section};
pub use storage::ReportStore;
