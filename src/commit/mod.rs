//! Commit classification and grouping.

pub mod classify;
pub mod group;

pub use classify::{
    Classification, ClassifiedCommit, TRIVIAL_RULES, TrivialKind, classify, trivial_kind,
};
pub use group::{
    DEFAULT_SUMMARY_MAX_LEN, GroupKey, clean_commit_message, extract_keywords, group_key,
    merge_related, summarize_commit,
};
