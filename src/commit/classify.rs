//! Commit message classification.
//!
//! Parses a free-text commit subject into a conventional-commit type, scope and
//! description, and flags low-information commits (typos, merges, formatting)
//! so they can be left out of the report.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::git::RawCommit;

/// Type assigned to messages that do not follow the conventional format.
pub const OTHER_TYPE: &str = "other";

/// Pattern matching a `type(scope): description` header.
const CONVENTIONAL_PATTERN: &str = r"^(\w+)(?:\(([^)]+)\))?\s*:\s*(.+)$";

/// Why a commit was judged trivial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrivialKind {
    Typo,
    DocsOnly,
    Merge,
    WorkInProgress,
    Formatting,
}

/// One entry of the trivial-commit rule table.
#[derive(Debug, Clone, Copy)]
pub struct TrivialRule {
    pub pattern: &'static str,
    pub kind: TrivialKind,
}

/// Ordered trivial-commit rules. Matched against the lower-cased, trimmed
/// message; the first match wins.
pub const TRIVIAL_RULES: &[TrivialRule] = &[
    TrivialRule {
        pattern: r"^fix\s*typo",
        kind: TrivialKind::Typo,
    },
    TrivialRule {
        pattern: r"^typo",
        kind: TrivialKind::Typo,
    },
    TrivialRule {
        pattern: r"^update\s*(readme|changelog)",
        kind: TrivialKind::DocsOnly,
    },
    TrivialRule {
        pattern: r"^merge\s+branch",
        kind: TrivialKind::Merge,
    },
    TrivialRule {
        pattern: r"^merge\s+pull\s+request",
        kind: TrivialKind::Merge,
    },
    TrivialRule {
        pattern: r"^wip$",
        kind: TrivialKind::WorkInProgress,
    },
    TrivialRule {
        pattern: r"^wip:",
        kind: TrivialKind::WorkInProgress,
    },
    TrivialRule {
        pattern: r"^format",
        kind: TrivialKind::Formatting,
    },
    TrivialRule {
        pattern: r"^lint",
        kind: TrivialKind::Formatting,
    },
    TrivialRule {
        pattern: r"^style:",
        kind: TrivialKind::Formatting,
    },
];

static COMPILED_RULES: LazyLock<Vec<(Regex, TrivialKind)>> = LazyLock::new(|| {
    TRIVIAL_RULES
        .iter()
        .map(|rule| {
            let re = Regex::new(&format!("(?i){}", rule.pattern))
                .expect("trivial rule patterns are valid regexes");
            (re, rule.kind)
        })
        .collect()
});

static CONVENTIONAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(CONVENTIONAL_PATTERN).expect("conventional commit pattern is a valid regex")
});

/// Result of classifying one commit message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Lower-cased conventional type, or `"other"`.
    pub commit_type: String,
    pub scope: Option<String>,
    /// Message with any `type(scope): ` prefix removed.
    pub description: String,
    pub is_trivial: bool,
}

/// Classify a commit message. Never fails: any string yields a result.
pub fn classify(message: &str) -> Classification {
    let is_trivial = trivial_kind(message).is_some();

    match CONVENTIONAL_RE.captures(message) {
        Some(caps) => Classification {
            commit_type: caps
                .get(1)
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_else(|| OTHER_TYPE.to_string()),
            scope: caps.get(2).map(|m| m.as_str().to_string()),
            description: caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default(),
            is_trivial,
        },
        None => Classification {
            commit_type: OTHER_TYPE.to_string(),
            scope: None,
            description: message.to_string(),
            is_trivial,
        },
    }
}

/// Return the first trivial rule the message matches, if any.
pub fn trivial_kind(message: &str) -> Option<TrivialKind> {
    let normalized = message.trim().to_lowercase();
    COMPILED_RULES
        .iter()
        .find(|(re, _)| re.is_match(&normalized))
        .map(|(_, kind)| *kind)
}

/// A raw commit together with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedCommit {
    #[serde(flatten)]
    pub raw: RawCommit,
    pub commit_type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_trivial: bool,
}

impl ClassifiedCommit {
    /// Classify a raw commit from its message.
    pub fn new(raw: RawCommit) -> Self {
        let Classification {
            commit_type,
            scope,
            description,
            is_trivial,
        } = classify(&raw.message);

        Self {
            raw,
            commit_type,
            scope,
            description,
            is_trivial,
        }
    }

    pub fn message(&self) -> &str {
        &self.raw.message
    }

    pub fn project(&self) -> &str {
        &self.raw.project
    }

    pub fn is_feature(&self) -> bool {
        self.commit_type == "feat"
    }
}
