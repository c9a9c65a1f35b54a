//! Author filtering for "my commits only" reports.

use git2::Repository;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Matches commits whose author name or email contains any pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorFilter {
    patterns: Vec<String>,
}

impl AuthorFilter {
    /// Build a filter, dropping blank patterns. Returns `None` when nothing
    /// is left to match on.
    pub fn new<I, S>(patterns: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if patterns.is_empty() {
            None
        } else {
            Some(Self { patterns })
        }
    }

    /// Filter on the configured identity (`user.name` / `user.email`).
    pub fn from_identity(name: Option<&str>, email: Option<&str>) -> Option<Self> {
        Self::new(name.into_iter().chain(email))
    }

    /// Read `user.name` and `user.email` from the repository's config chain.
    pub fn detect(repo: &Repository) -> Option<Self> {
        let config = repo.config().ok()?;
        let name = config.get_string("user.name").ok();
        let email = config.get_string("user.email").ok();
        debug!("Detected git identity: name={:?} email={:?}", name, email);
        Self::from_identity(name.as_deref(), email.as_deref())
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches(&self, name: &str, email: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| name.contains(p.as_str()) || email.contains(p.as_str()))
    }
}

/// How to pick the author filter for a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthorMode {
    /// Use each repository's configured identity.
    #[default]
    Auto,
    /// Include every author.
    All,
    /// Use a fixed pattern for every repository.
    Pattern(String),
}

impl AuthorMode {
    /// Resolve the filter to apply in `repo`.
    pub fn resolve(&self, repo: &Repository) -> Option<AuthorFilter> {
        match self {
            Self::Auto => AuthorFilter::detect(repo),
            Self::All => None,
            Self::Pattern(pattern) => AuthorFilter::new([pattern]),
        }
    }
}

impl std::str::FromStr for AuthorMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_lowercase().as_str() {
            "auto" => Self::Auto,
            "" | "all" | "*" => Self::All,
            _ => Self::Pattern(trimmed.to_string()),
        })
    }
}
