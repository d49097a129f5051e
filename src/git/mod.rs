//! Git operations layer
//!
//! Every operation runs `git` through a [`ShellRunner`], in the shell's
//! current logical directory. Higher-level flows live in the submodules:
//! cloning ([`clone`]), branch handling ([`branch`]) and commit-and-push
//! ([`push`]).

pub mod branch;
pub mod clone;
pub mod error;
pub mod push;
pub mod url;

pub use clone::{clone_repository, CloneRequest, ClonedRepo, SubfolderPolicy};
pub use error::GitFailure;
pub use push::{push_item, push_repository, Author, PushOutcome, PushStatus};
pub use url::{prepend_token_to_github_url, repo_name, AzurePlaceholder};

use std::path::Path;

use crate::error::Result;
use crate::subprocess::{ExitStatus, ShellRunner};

/// Set the committer identity of the repository
pub async fn configure_identity(shell: &ShellRunner, email: &str, name: &str) -> Result<()> {
    shell.git().args(["config", "user.email", email]).run().await?;
    shell.git().args(["config", "user.name", name]).run().await?;
    Ok(())
}

/// Branch currently checked out
pub async fn current_branch(shell: &ShellRunner) -> Result<String> {
    let out = shell
        .git()
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .run()
        .await?;
    Ok(out.trim().to_string())
}

/// Whether the index differs from HEAD.
///
/// `git diff --cached --quiet` exits 1 when something is staged; any other
/// failure is reported as an error.
pub async fn has_staged_changes(shell: &ShellRunner) -> Result<bool> {
    match shell.git().args(["diff", "--cached", "--quiet"]).probe().await? {
        ExitStatus::Success => Ok(false),
        ExitStatus::Error(1) => Ok(true),
        status => Err(crate::error::Error::Shell {
            command: "git diff --cached --quiet".to_string(),
            detail: status.to_string(),
        }),
    }
}

/// Trust the cloned repository regardless of ownership. Failure is only a warning.
pub async fn add_safe_directory(shell: &ShellRunner, path: &Path) {
    let path = path.display().to_string();
    if let Err(e) = shell
        .git()
        .args(["config", "--global", "--add", "safe.directory", &path])
        .run()
        .await
    {
        tracing::warn!("Could not add safe.directory config: {}", e);
    }
}

/// Undo [`add_safe_directory`]. Failure is only a warning.
pub async fn remove_safe_directory(shell: &ShellRunner, path: &Path) {
    let path = path.display().to_string();
    if let Err(e) = shell
        .git()
        .args(["config", "--global", "--unset", "safe.directory", &path])
        .run()
        .await
    {
        tracing::warn!("Could not unset safe.directory config: {}", e);
    }
}
