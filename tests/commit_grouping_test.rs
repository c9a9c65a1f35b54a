//! Integration tests for commit classification and grouping.

mod common;

use common::raw_commit;
use weekly_report::commit::{
    ClassifiedCommit, DEFAULT_SUMMARY_MAX_LEN, GroupKey, TrivialKind, classify, extract_keywords,
    group_key, merge_related, summarize_commit, trivial_kind,
};

fn classified(messages: &[&str]) -> Vec<ClassifiedCommit> {
    messages
        .iter()
        .map(|m| ClassifiedCommit::new(raw_commit("app", m)))
        .collect()
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

#[test]
fn test_classify_conventional_with_scope() {
    let c = classify("Feat(auth): support SSO");
    assert_eq!(c.commit_type, "feat");
    assert_eq!(c.scope.as_deref(), Some("auth"));
    assert_eq!(c.description, "support SSO");
    assert!(!c.is_trivial);
}

#[test]
fn test_classify_free_text_is_other() {
    let c = classify("reworked the login flow");
    assert_eq!(c.commit_type, "other");
    assert_eq!(c.scope, None);
    assert_eq!(c.description, "reworked the login flow");
}

#[test]
fn test_classify_chinese_message() {
    let c = classify("fix: 修复登录问题");
    assert_eq!(c.commit_type, "fix");
    assert_eq!(c.description, "修复登录问题");
}

#[test]
fn test_classify_chinese_type() {
    let c = classify("修复: 登录问题");
    assert_eq!(c.commit_type, "修复");
    assert_eq!(c.description, "登录问题");
    assert_eq!(summarize_commit("修复: 登录问题", DEFAULT_SUMMARY_MAX_LEN), "登录问题");
}

#[test]
fn test_trivial_messages() {
    assert_eq!(trivial_kind("Fix typo in docs"), Some(TrivialKind::Typo));
    assert_eq!(trivial_kind("Merge branch 'dev'"), Some(TrivialKind::Merge));
    assert_eq!(trivial_kind("Merge pull request #12"), Some(TrivialKind::Merge));
    assert_eq!(trivial_kind("  WIP  "), Some(TrivialKind::WorkInProgress));
    assert_eq!(trivial_kind("update README"), Some(TrivialKind::DocsOnly));
    assert_eq!(trivial_kind("style: spacing"), Some(TrivialKind::Formatting));
    assert_eq!(trivial_kind("feat: typography settings"), None);
    assert_eq!(trivial_kind("wipe cache on logout"), None);
}

// =============================================================================
// KEYWORDS AND KEYS
// =============================================================================

#[test]
fn test_keywords_mixed_scripts() {
    assert_eq!(
        extract_keywords("feat: 登录 page for users"),
        vec!["登录", "page", "users"]
    );
}

#[test]
fn test_keywords_capped() {
    assert_eq!(
        extract_keywords("export invoices reports dashboards"),
        vec!["export", "invoices", "reports"]
    );
}

#[test]
fn test_group_key_ignores_word_order_and_prefix() {
    assert_eq!(
        group_key("feat: export invoices"),
        group_key("fix(billing): invoices export")
    );
}

#[test]
fn test_group_key_falls_back_to_message() {
    assert_eq!(group_key("v1.2"), GroupKey::Message("v1.2".to_string()));
}

#[test]
fn test_summarize_commit_truncates_by_chars() {
    let summary = summarize_commit(
        "feat: 实现用户登录与注册功能并增加第三方认证支持以及多因素验证",
        10,
    );
    assert_eq!(summary.chars().count(), 10);
    assert!(summary.ends_with("..."));
}

// =============================================================================
// MERGING
// =============================================================================

#[test]
fn test_merge_related_collapses_iterations() {
    let commits = classified(&["feat: add login", "feat: refine login", "chore: bump deps"]);
    let entries = merge_related(&commits, DEFAULT_SUMMARY_MAX_LEN);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].summary(), "add login");
    assert_eq!(entries[0].details(), ["add login", "refine login"]);
    assert_eq!(entries[1].summary(), "bump deps");
    assert!(entries[1].details().is_empty());
}

#[test]
fn test_merge_related_prefers_feature_summary() {
    let commits = classified(&["fix: redirect login", "feat: login redirect"]);
    let entries = merge_related(&commits, 40);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].summary(), "login redirect");
    assert_eq!(entries[0].details(), ["redirect login", "login redirect"]);
}

#[test]
fn test_merge_related_identical_messages_have_no_details() {
    let commits = classified(&["feat: search index", "feat: search index"]);
    let entries = merge_related(&commits, 40);
    assert_eq!(entries.len(), 1);
    assert!(entries[0].details().is_empty());
}

#[test]
fn test_merge_related_different_keywords_stay_apart() {
    let commits = classified(&["fix: login redirect", "feat: login redirect flow"]);
    assert_eq!(merge_related(&commits, 40).len(), 2);
}

#[test]
fn test_merge_related_empty() {
    assert!(merge_related(&[], DEFAULT_SUMMARY_MAX_LEN).is_empty());
}

#[test]
fn test_summary_of_thirty_chars_is_cut_to_twenty() {
    let description = "abcdefghijklmnopqrstuvwxyz1234";
    assert_eq!(description.chars().count(), 30);

    let summary = summarize_commit(&format!("feat: {}", description), DEFAULT_SUMMARY_MAX_LEN);
    assert_eq!(summary, "abcdefghijklmnopq...");
    assert_eq!(summary.chars().count(), 20);
}
