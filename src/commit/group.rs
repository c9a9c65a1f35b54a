//! Grouping of related commits into report entries.
//!
//! Commits that share the same salient keywords are treated as iterations on
//! one unit of work and collapse into a single [`Entry`], with every distinct
//! commit description kept as a nested detail.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::report::Entry;

use super::classify::ClassifiedCommit;

/// Default display length of an entry summary, in characters.
pub const DEFAULT_SUMMARY_MAX_LEN: usize = 20;

/// Marker appended to truncated summaries.
pub const TRUNCATION_MARKER: &str = "...";

/// At most this many keywords form a grouping key. Tuning constant.
pub const MAX_KEY_KEYWORDS: usize = 3;

/// Minimum length of an alphabetic keyword.
const MIN_WORD_LEN: usize = 3;

/// Filler words and generic action verbs that carry no topic.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "this", "that", "from", "into", "add", "adds", "added",
    "refine", "refined", "improve", "improved", "update", "updated", "implement",
    "implemented", "complete", "finish", "polish", "tweak",
];

static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)(\([^)]+\))?\s*:\s*").expect("prefix pattern is a valid regex")
});

/// Identity of a group of related commits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Sorted, space-joined keywords.
    Keywords(String),
    /// The full message, used when no keyword could be extracted.
    Message(String),
}

/// Strip a `type(scope): ` prefix and surrounding whitespace.
pub fn clean_commit_message(message: &str) -> String {
    PREFIX_RE.replace(message, "").trim().to_string()
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn flush_token(token: &mut String, cjk: bool, tokens: &mut Vec<String>) {
    if cjk {
        tokens.push(std::mem::take(token));
    } else {
        if token.chars().count() >= MIN_WORD_LEN {
            tokens.push(token.to_lowercase());
        }
        token.clear();
    }
}

/// Extract up to [`MAX_KEY_KEYWORDS`] keywords in order of appearance: CJK
/// runs, and alphabetic words of at least three letters (lower-cased), minus
/// stop words.
pub fn extract_keywords(message: &str) -> Vec<String> {
    let cleaned = PREFIX_RE.replace(message, "");
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_is_cjk = false;

    for c in cleaned.chars() {
        let class = if is_cjk(c) {
            Some(true)
        } else if c.is_ascii_alphabetic() {
            Some(false)
        } else {
            None
        };

        match class {
            Some(cjk) => {
                if cjk != current_is_cjk && !current.is_empty() {
                    flush_token(&mut current, current_is_cjk, &mut tokens);
                }
                current_is_cjk = cjk;
                current.push(c);
            }
            None if !current.is_empty() => {
                flush_token(&mut current, current_is_cjk, &mut tokens);
            }
            None => {}
        }
    }
    if !current.is_empty() {
        flush_token(&mut current, current_is_cjk, &mut tokens);
    }

    tokens
        .into_iter()
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .take(MAX_KEY_KEYWORDS)
        .collect()
}

/// Grouping key for one commit message.
pub fn group_key(message: &str) -> GroupKey {
    let mut keywords = extract_keywords(message);
    if keywords.is_empty() {
        return GroupKey::Message(message.to_string());
    }
    keywords.sort();
    GroupKey::Keywords(keywords.join(" "))
}

/// Cleaned description cut to `max_len` characters, with the truncation
/// marker counted inside the limit.
pub fn summarize_commit(message: &str, max_len: usize) -> String {
    let cleaned = clean_commit_message(message);
    if cleaned.chars().count() <= max_len {
        return cleaned;
    }

    let keep = max_len.saturating_sub(TRUNCATION_MARKER.chars().count());
    let mut summary: String = cleaned.chars().take(keep).collect();
    summary.push_str(TRUNCATION_MARKER);
    summary.trim().to_string()
}

/// Merge related commits of one project into entries.
///
/// Expects trivial commits to be filtered out already. Groups keep the order
/// in which their first commit appears. The first `feat` commit of a group
/// (else its first commit) provides the summary; details list every distinct
/// description and are left empty when fewer than two remain.
pub fn merge_related(commits: &[ClassifiedCommit], max_len: usize) -> Vec<Entry> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: HashMap<GroupKey, Vec<&ClassifiedCommit>> = HashMap::new();

    for commit in commits {
        let key = group_key(commit.message());
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(commit);
    }

    order
        .iter()
        .filter_map(|key| groups.get(key))
        .filter_map(|members| {
            let representative = members
                .iter()
                .find(|c| c.is_feature())
                .or_else(|| members.first())?;
            let summary = summarize_commit(representative.message(), max_len);

            let details: Vec<String> = members
                .iter()
                .map(|c| clean_commit_message(c.message()))
                .collect();
            let entry = Entry::new(summary, details);

            Some(if entry.details().len() < 2 {
                Entry::bullet(entry.summary())
            } else {
                entry
            })
        })
        .collect()
}
