//! Runtime configuration
//!
//! Two layers feed a job:
//! - [`GitSyncConfig`]: tool locations and local paths, read from an optional
//!   TOML file and overridden by environment variables.
//! - [`JobEnv`]: the values the platform injects into every job
//!   (workspace, token, URLs, user identity).

mod job_env;

pub use job_env::JobEnv;

use crate::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_GPG_HOME: &str = "/tmp/gpg";
pub const DEFAULT_AZURE_LOGIN_URL: &str = "https://login.microsoftonline.com";
pub const DEFAULT_TODO_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Location of the user-level config file, if a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "gitsync", "gitsync").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Binaries invoked by the jobs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolPaths {
    pub git: String,
    pub gpg: String,
    pub wmill: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            gpg: "gpg".to_string(),
            wmill: "wmill".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSyncConfig {
    pub tools: ToolPaths,
    /// Keyring directory used while signing commits
    pub gpg_home: PathBuf,
    /// HOME handed to subprocesses, relative paths resolve against the job directory
    pub home_dir: PathBuf,
    pub azure_login_url: String,
    pub todo_base_url: String,
    pub log_level: Option<String>,
}

impl Default for GitSyncConfig {
    fn default() -> Self {
        Self {
            tools: ToolPaths::default(),
            gpg_home: PathBuf::from(DEFAULT_GPG_HOME),
            home_dir: PathBuf::from("."),
            azure_login_url: DEFAULT_AZURE_LOGIN_URL.to_string(),
            todo_base_url: DEFAULT_TODO_BASE_URL.to_string(),
            log_level: None,
        }
    }
}

impl GitSyncConfig {
    /// Load the config file (explicit path, else the user-level default when
    /// present) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.merge_env_vars(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn merge_env_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(gpg_home) = lookup("GNUPGHOME") {
            self.gpg_home = PathBuf::from(gpg_home);
        }

        if let Some(home) = lookup("GITSYNC_HOME") {
            self.home_dir = PathBuf::from(home);
        }

        if let Some(git) = lookup("GITSYNC_GIT") {
            self.tools.git = git;
        }

        if let Some(gpg) = lookup("GITSYNC_GPG") {
            self.tools.gpg = gpg;
        }

        if let Some(wmill) = lookup("GITSYNC_WMILL") {
            self.tools.wmill = wmill;
        }

        if let Some(log_level) = lookup("GITSYNC_LOG") {
            self.log_level = Some(log_level);
        }
    }

    /// HOME for subprocesses, anchored at `job_dir` when relative
    pub fn resolved_home(&self, job_dir: &Path) -> PathBuf {
        if self.home_dir.is_absolute() {
            self.home_dir.clone()
        } else {
            job_dir.join(&self.home_dir)
        }
    }
}
