//! Commit sources: where raw commits come from.

use async_trait::async_trait;
use chrono::FixedOffset;
use tracing::{info, warn};

use crate::config::RepoEntry;
use crate::error::GitError;
use crate::period::DateWindow;

use super::author::AuthorMode;
use super::commits::{RawCommit, fetch_commits, open_repository};

/// Trait for fetching the commits of one repository.
///
/// This abstraction allows mocking version control in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Fetch the commits of `repo` inside `window`.
    async fn fetch(
        &self,
        repo: &RepoEntry,
        window: DateWindow,
        author: &AuthorMode,
    ) -> Result<Vec<RawCommit>, GitError>;
}

/// Default source reading repositories through git2.
pub struct Git2Source {
    pub offset: FixedOffset,
}

impl Git2Source {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

#[async_trait]
impl CommitSource for Git2Source {
    async fn fetch(
        &self,
        repo: &RepoEntry,
        window: DateWindow,
        author: &AuthorMode,
    ) -> Result<Vec<RawCommit>, GitError> {
        let entry = repo.clone();
        let author = author.clone();
        let offset = self.offset;

        // git2 is blocking; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let repository = open_repository(&entry.path)?;
            let filter = author.resolve(&repository);
            fetch_commits(&repository, &entry.name, &window, filter.as_ref(), offset)
        })
        .await
        .map_err(|e| GitError::TaskFailed(e.to_string()))?
    }
}

/// Fetch commits from every repository in order.
///
/// A repository that cannot be read contributes no commits; the failure is
/// logged and the run continues.
pub async fn collect_commits<S>(
    source: &S,
    repos: &[RepoEntry],
    window: DateWindow,
    author: &AuthorMode,
) -> Vec<RawCommit>
where
    S: CommitSource + ?Sized,
{
    let mut all = Vec::new();

    for repo in repos {
        match source.fetch(repo, window, author).await {
            Ok(commits) => {
                info!("{}: {} commits", repo.name, commits.len());
                all.extend(commits);
            }
            Err(e) => {
                warn!("Skipping repository {} ({}): {}", repo.name, repo.path.display(), e);
            }
        }
    }

    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn repo(name: &str) -> RepoEntry {
        RepoEntry {
            name: name.to_string(),
            path: PathBuf::from(format!("/repos/{}", name)),
        }
    }

    fn window() -> DateWindow {
        DateWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
        .unwrap()
    }

    fn raw(project: &str, message: &str) -> RawCommit {
        RawCommit {
            id: "abc".to_string(),
            message: message.to_string(),
            author: "Test User".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            project: project.to_string(),
        }
    }

    #[tokio::test]
    async fn test_collect_commits_keeps_repo_order() {
        let mut mock = MockCommitSource::new();
        mock.expect_fetch()
            .times(2)
            .returning(|repo, _, _| Ok(vec![raw(&repo.name, "feat: work")]));

        let repos = [repo("b"), repo("a")];
        let commits = collect_commits(&mock, &repos, window(), &AuthorMode::All).await;

        let projects: Vec<&str> = commits.iter().map(|c| c.project.as_str()).collect();
        assert_eq!(projects, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_collect_commits_soft_fails() {
        let mut mock = MockCommitSource::new();
        mock.expect_fetch().times(2).returning(|repo, _, _| {
            if repo.name == "broken" {
                Err(GitError::TaskFailed("boom".to_string()))
            } else {
                Ok(vec![raw(&repo.name, "fix: bug")])
            }
        });

        let repos = [repo("broken"), repo("ok")];
        let commits = collect_commits(&mock, &repos, window(), &AuthorMode::Auto).await;

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].project, "ok");
    }

    #[tokio::test]
    async fn test_git2_source_missing_repo_is_error() {
        let source = Git2Source::new(FixedOffset::east_opt(8 * 3600).unwrap());
        let result = source
            .fetch(&repo("definitely-missing"), window(), &AuthorMode::All)
            .await;
        assert!(matches!(result, Err(GitError::OpenRepository { .. })));
    }
}
