//! Git operations using git2-rs.

pub mod author;
pub mod commits;
pub mod source;

pub use author::{AuthorFilter, AuthorMode};
pub use commits::{RawCommit, fetch_commits, open_repository};
pub use source::{CommitSource, Git2Source, collect_commits};
