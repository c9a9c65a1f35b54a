//! Integration tests for reading commits from git repositories.
//!
//! Tests `fetch_commits` and `collect_commits` against temporary git
//! repositories with controlled authors and timestamps.

mod common;

use common::{TestRepo, china_offset, china_timestamp, date};
use weekly_report::git::{AuthorFilter, AuthorMode, Git2Source, collect_commits, fetch_commits};
use weekly_report::period::DateWindow;
use weekly_report::RepoEntry;

fn week_of_jan_8() -> DateWindow {
    DateWindow::new(date(2024, 1, 8), date(2024, 1, 14)).unwrap()
}

// =============================================================================
// DATE WINDOW TESTS
// =============================================================================

#[test]
fn test_fetch_commits_only_inside_window() {
    let test_repo = TestRepo::new();

    test_repo.commit_at("feat: before window", china_timestamp(2024, 1, 7, 23));
    test_repo.commit_at("feat: first day", china_timestamp(2024, 1, 8, 0));
    test_repo.commit_at("fix: last day", china_timestamp(2024, 1, 14, 23));
    test_repo.commit_at("feat: after window", china_timestamp(2024, 1, 15, 0));

    let commits = fetch_commits(&test_repo.repo, "app", &week_of_jan_8(), None, china_offset())
        .expect("Failed to fetch commits");

    let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["fix: last day", "feat: first day"]);
}

#[test]
fn test_fetch_commits_tags_project_and_date() {
    let test_repo = TestRepo::new();
    let oid = test_repo.commit_at("feat: login page", china_timestamp(2024, 1, 9, 10));

    let commits = fetch_commits(&test_repo.repo, "web", &week_of_jan_8(), None, china_offset())
        .expect("Failed to fetch commits");

    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].id, oid.to_string());
    assert_eq!(commits[0].project, "web");
    assert_eq!(commits[0].date, date(2024, 1, 9));
    assert_eq!(commits[0].author, "Test User");
}

#[test]
fn test_fetch_commits_uses_first_line_only() {
    let test_repo = TestRepo::new();
    test_repo.commit_at(
        "feat: add export\n\nLong body explaining the change.",
        china_timestamp(2024, 1, 10, 12),
    );

    let commits = fetch_commits(&test_repo.repo, "app", &week_of_jan_8(), None, china_offset())
        .expect("Failed to fetch commits");

    assert_eq!(commits[0].message, "feat: add export");
}

#[test]
fn test_fetch_commits_empty_repository() {
    let test_repo = TestRepo::new();

    let commits = fetch_commits(&test_repo.repo, "app", &week_of_jan_8(), None, china_offset())
        .expect("Empty repository should not be an error");

    assert!(commits.is_empty());
}

#[test]
fn test_fetch_commits_includes_other_branches() {
    let test_repo = TestRepo::new();
    let base = test_repo.commit_at("feat: base", china_timestamp(2024, 1, 8, 9));
    let side = test_repo.commit_detached("feat: side work", base, china_timestamp(2024, 1, 9, 9));
    test_repo.branch("side", side);

    let commits = fetch_commits(&test_repo.repo, "app", &week_of_jan_8(), None, china_offset())
        .expect("Failed to fetch commits");

    let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["feat: side work", "feat: base"]);
}

// =============================================================================
// AUTHOR FILTER TESTS
// =============================================================================

#[test]
fn test_fetch_commits_filters_by_author() {
    let test_repo = TestRepo::new();
    let ts = china_timestamp(2024, 1, 9, 10);
    test_repo.commit_as("feat: mine", "Alice", "alice@corp.com", ts);
    test_repo.commit_as("feat: theirs", "Bob", "bob@corp.com", ts + 60);

    let filter = AuthorFilter::new(["alice"]).unwrap();
    let commits = fetch_commits(
        &test_repo.repo,
        "app",
        &week_of_jan_8(),
        Some(&filter),
        china_offset(),
    )
    .expect("Failed to fetch commits");

    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].message, "feat: mine");
}

#[test]
fn test_author_mode_auto_uses_repo_identity() {
    let test_repo = TestRepo::new();
    test_repo.set_identity("Alice", "alice@corp.com");

    let filter = AuthorMode::Auto.resolve(&test_repo.repo).unwrap();
    assert!(filter.matches("Alice", "x@y.z"));
    assert!(!filter.matches("Bob", "bob@corp.com"));
    assert!(AuthorMode::All.resolve(&test_repo.repo).is_none());
}

// =============================================================================
// COLLECTION ACROSS REPOSITORIES
// =============================================================================

#[tokio::test]
async fn test_collect_commits_skips_unreadable_repositories() {
    let app = TestRepo::new();
    app.commit_at("feat: dashboard", china_timestamp(2024, 1, 10, 10));

    let missing = RepoEntry {
        name: "gone".to_string(),
        path: std::env::temp_dir().join("weekly-report-missing-repo-for-test"),
    };
    let repos = vec![missing, app.entry("app")];

    let source = Git2Source::new(china_offset());
    let commits = collect_commits(&source, &repos, week_of_jan_8(), &AuthorMode::All).await;

    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].project, "app");
}

#[tokio::test]
async fn test_collect_commits_keeps_repository_order() {
    let first = TestRepo::new();
    first.commit_at("feat: one", china_timestamp(2024, 1, 9, 10));
    let second = TestRepo::new();
    second.commit_at("feat: two", china_timestamp(2024, 1, 9, 11));

    let repos = vec![second.entry("second"), first.entry("first")];
    let source = Git2Source::new(china_offset());
    let commits = collect_commits(&source, &repos, week_of_jan_8(), &AuthorMode::All).await;

    let projects: Vec<&str> = commits.iter().map(|c| c.project.as_str()).collect();
    assert_eq!(projects, vec!["second", "first"]);
}
