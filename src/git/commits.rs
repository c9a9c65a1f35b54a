//! Commit fetching over a calendar window.

use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use git2::{Commit, Repository, Sort};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GitError;
use crate::period::DateWindow;

use super::author::AuthorFilter;

/// A commit as read from version control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommit {
    pub id: String,
    /// First line of the commit message.
    pub message: String,
    pub author: String,
    /// Author date in the author's own offset.
    pub date: NaiveDate,
    /// Project (registered repository name) the commit belongs to.
    pub project: String,
}

impl RawCommit {
    /// Build a RawCommit from a git2 Commit.
    ///
    /// Returns `None` when the author timestamp cannot be represented.
    pub fn from_git2_commit(commit: &Commit, project: &str) -> Option<Self> {
        let author = commit.author();
        let when = author.when();
        let author_offset = FixedOffset::east_opt(when.offset_minutes() * 60)?;
        let date = DateTime::from_timestamp(when.seconds(), 0)?
            .with_timezone(&author_offset)
            .date_naive();

        Some(Self {
            id: commit.id().to_string(),
            message: commit.summary().unwrap_or("").to_string(),
            author: author.name().unwrap_or("").to_string(),
            date,
            project: project.to_string(),
        })
    }
}

/// Open the repository at `path`.
pub fn open_repository(path: &Path) -> Result<Repository, GitError> {
    Repository::open(path).map_err(|source| GitError::OpenRepository {
        path: path.to_path_buf(),
        source,
    })
}

/// Fetch commits from every ref whose committer time falls inside `window`
/// (interpreted in `offset`), newest first, optionally restricted by author.
pub fn fetch_commits(
    repo: &Repository,
    project: &str,
    window: &DateWindow,
    author: Option<&AuthorFilter>,
    offset: FixedOffset,
) -> Result<Vec<RawCommit>, GitError> {
    let Some((since, until)) = window_bounds(window, offset) else {
        warn!("Date window {} cannot be represented, skipping {}", window.display(), project);
        return Ok(Vec::new());
    };

    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk.set_sorting(Sort::TIME).map_err(GitError::RevwalkError)?;
    revwalk.push_glob("*").map_err(GitError::RevwalkError)?;
    if repo.head().is_ok() {
        revwalk.push_head().map_err(GitError::RevwalkError)?;
    }

    let mut commits = Vec::new();

    for oid_result in revwalk {
        let oid = oid_result.map_err(GitError::RevwalkError)?;
        let commit = repo.find_commit(oid).map_err(GitError::ParseCommit)?;

        let time = commit.time().seconds();
        if time < since || time >= until {
            continue;
        }

        if let Some(filter) = author {
            let sig = commit.author();
            if !filter.matches(sig.name().unwrap_or(""), sig.email().unwrap_or("")) {
                continue;
            }
        }

        match RawCommit::from_git2_commit(&commit, project) {
            Some(raw) => commits.push(raw),
            None => warn!("Skipping commit {} with invalid author timestamp", oid),
        }
    }

    debug!("{}: {} commits in {}", project, commits.len(), window.display());

    Ok(commits)
}

/// Unix-second bounds `[since, until)` of the window in `offset`.
fn window_bounds(window: &DateWindow, offset: FixedOffset) -> Option<(i64, i64)> {
    let since = offset.from_local_datetime(&window.since()).single()?;
    let until = offset.from_local_datetime(&window.until()).single()?;
    Some((since.timestamp(), until.timestamp()))
}
