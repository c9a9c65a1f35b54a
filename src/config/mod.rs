//! Tool configuration and repository registry.
//!
//! Stored as `config.json` in the report root. Every field has a default, so
//! older or hand-trimmed files keep loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::commit::DEFAULT_SUMMARY_MAX_LEN;
use crate::error::ConfigError;
use crate::git::AuthorMode;
use crate::period::DEFAULT_OFFSET_HOURS;
use crate::report::ReportLocale;

/// Environment variable overriding the report root.
pub const HOME_ENV: &str = "WEEKLY_REPORT_HOME";

/// Directory name of the default report root under `$HOME`.
pub const DEFAULT_DIR_NAME: &str = ".weekly-reports";

pub const CONFIG_FILE_NAME: &str = "config.json";

/// A registered repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub repos: Vec<RepoEntry>,
    /// `"auto"`, `"all"`, or a literal author pattern.
    pub default_author: String,
    pub output_format: String,
    pub timezone_offset_hours: i32,
    pub summary_max_length: usize,
    pub locale: ReportLocale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            default_author: "auto".to_string(),
            output_format: "markdown".to_string(),
            timezone_offset_hours: DEFAULT_OFFSET_HOURS,
            summary_max_length: DEFAULT_SUMMARY_MAX_LEN,
            locale: ReportLocale::default(),
        }
    }
}

impl Config {
    /// Add a repository, or update the path of one with the same name.
    pub fn add_repo(&mut self, name: &str, path: impl Into<PathBuf>) {
        let path = path.into();
        match self.repos.iter_mut().find(|r| r.name == name) {
            Some(existing) => existing.path = path,
            None => self.repos.push(RepoEntry {
                name: name.to_string(),
                path,
            }),
        }
    }

    /// Remove a repository by name.
    pub fn remove_repo(&mut self, name: &str) -> Result<RepoEntry, ConfigError> {
        let idx = self
            .repos
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| ConfigError::UnknownRepository(name.to_string()))?;
        Ok(self.repos.remove(idx))
    }

    /// Registered repositories, optionally restricted to `names`.
    pub fn select_repos(&self, names: &[String]) -> Result<Vec<RepoEntry>, ConfigError> {
        if names.is_empty() {
            return Ok(self.repos.clone());
        }
        names
            .iter()
            .map(|name| {
                self.repos
                    .iter()
                    .find(|r| &r.name == name)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownRepository(name.clone()))
            })
            .collect()
    }

    pub fn author_mode(&self) -> AuthorMode {
        self.default_author.parse().unwrap_or_default()
    }
}

/// Resolve the report root: explicit dir, else `WEEKLY_REPORT_HOME`, else
/// `~/.weekly-reports`.
pub fn resolve_base_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_DIR_NAME))
        .ok_or(ConfigError::NoHomeDirectory)
}

pub fn config_path(base_dir: &Path) -> PathBuf {
    base_dir.join(CONFIG_FILE_NAME)
}

/// Load the config. Missing or unreadable files fall back to defaults.
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Cannot read config {}: {}. Using defaults.", path.display(), e);
            return Config::default();
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!("Invalid config {}: {}. Using defaults.", path.display(), e);
        Config::default()
    })
}

/// Save the config as pretty JSON, creating parent directories.
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(ConfigError::SerializeFailed)?;
    std::fs::write(path, json + "\n").map_err(write_err)
}

/// Check that `path` exists, is a directory and holds a git repository.
pub fn validate_repo(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ConfigError::NotADirectory(path.to_path_buf()));
    }
    if !path.join(".git").exists() {
        return Err(ConfigError::NotAGitRepository(path.to_path_buf()));
    }
    Ok(())
}
