//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use chrono::{FixedOffset, NaiveDate, TimeZone};
use git2::{Oid, Repository, Signature, Time};

use weekly_report::config::RepoEntry;
use weekly_report::git::RawCommit;

/// UTC+8, the default report offset.
pub fn china_offset() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Unix seconds for a local time in UTC+8.
pub fn china_timestamp(y: i32, m: u32, d: u32, hour: u32) -> i64 {
    china_offset()
        .with_ymd_and_hms(y, m, d, hour, 0, 0)
        .single()
        .unwrap()
        .timestamp()
}

/// Build a RawCommit without touching git.
pub fn raw_commit(project: &str, message: &str) -> RawCommit {
    RawCommit {
        id: format!("{:040x}", message.len()),
        message: message.to_string(),
        author: "Test User".to_string(),
        date: date(2024, 1, 8),
        project: project.to_string(),
    }
}

/// Create a temporary directory for test output.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
    counter: std::cell::Cell<u32>,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self {
            dir,
            repo,
            counter: std::cell::Cell::new(0),
        }
    }

    /// Set the repository's configured identity.
    pub fn set_identity(&self, name: &str, email: &str) {
        let mut config = self.repo.config().expect("Failed to open repo config");
        config.set_str("user.name", name).expect("Failed to set user.name");
        config.set_str("user.email", email).expect("Failed to set user.email");
    }

    /// Registry entry pointing at this repository.
    pub fn entry(&self, name: &str) -> RepoEntry {
        RepoEntry {
            name: name.to_string(),
            path: self.dir.path().to_path_buf(),
        }
    }

    /// Commit as "Test User" at the given Unix time (UTC+8 offset).
    pub fn commit_at(&self, message: &str, seconds: i64) -> Oid {
        self.commit_as(message, "Test User", "test@example.com", seconds)
    }

    /// Create a commit with an explicit author and timestamp on HEAD.
    pub fn commit_as(&self, message: &str, name: &str, email: &str, seconds: i64) -> Oid {
        let sig = Signature::new(name, email, &Time::new(seconds, 8 * 60))
            .expect("Failed to create signature");

        let n = self.counter.get() + 1;
        self.counter.set(n);
        let file_path = self.dir.path().join("test.txt");
        std::fs::write(&file_path, format!("{}\n{}", message, n))
            .expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(std::path::Path::new("test.txt")).expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a branch pointing to the given OID.
    pub fn branch(&self, name: &str, oid: Oid) {
        let commit = self.repo.find_commit(oid).expect("Failed to find commit");
        self.repo.branch(name, &commit, false).expect("Failed to create branch");
    }

    /// Create a commit on top of `parent` without moving HEAD.
    pub fn commit_detached(&self, message: &str, parent: Oid, seconds: i64) -> Oid {
        let sig = Signature::new("Test User", "test@example.com", &Time::new(seconds, 8 * 60))
            .expect("Failed to create signature");
        let parent = self.repo.find_commit(parent).expect("Failed to find parent");
        let tree = parent.tree().expect("Failed to read tree");
        self.repo
            .commit(None, &sig, &sig, message, &tree, &[&parent])
            .expect("Failed to create commit")
    }
}
