//! Commit-and-push flows

use serde::{Deserialize, Serialize};

use super::error::GitFailure;
use super::has_staged_changes;
use crate::error::Result;
use crate::subprocess::ShellRunner;

pub const LOCK_FILE: &str = "wmill-lock.yaml";
const EMPTY_COMMIT_MESSAGE: &str = "no commit msg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushStatus {
    #[serde(rename = "changes pushed")]
    ChangesPushed,
    #[serde(rename = "no changes pushed")]
    NoChangesPushed,
}

/// Job result of a push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushOutcome {
    pub status: PushStatus,
}

impl From<PushStatus> for PushOutcome {
    fn from(status: PushStatus) -> Self {
        Self { status }
    }
}

/// Commit author for single-item pushes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Stage the lock file plus everything under each item path, commit and push.
///
/// A rejected push is retried once after `pull --rebase`.
pub async fn push_item(
    shell: &ShellRunner,
    item_paths: &[&str],
    author: &Author,
    message: &str,
) -> Result<PushStatus> {
    for path in item_paths.iter().filter(|p| !p.is_empty()) {
        let pattern = format!("{}**", path);
        if let Err(e) = shell.git().args(["add", LOCK_FILE, &pattern]).run().await {
            tracing::warn!("Unable to stage files matching {}, {}", pattern, e);
        }
    }

    if !has_staged_changes(shell).await? {
        tracing::info!("No changes detected, nothing to commit. Returning...");
        return Ok(PushStatus::NoChangesPushed);
    }

    let message = if message.is_empty() {
        EMPTY_COMMIT_MESSAGE
    } else {
        message
    };
    shell
        .git()
        .args(["commit", "--author", &author.to_string(), "-m", message])
        .run()
        .await?;

    if let Err(e) = shell.git().args(["push", "--porcelain"]).run().await {
        tracing::info!("Could not push, trying to rebase first: {}", e);
        shell.git().args(["pull", "--rebase"]).run().await?;
        shell.git().args(["push", "--porcelain"]).run().await?;
    }
    Ok(PushStatus::ChangesPushed)
}

/// Stage the whole working tree (except `.config`), commit and push to `branch`.
///
/// Pushing into a repository that has no branches yet renames the local
/// branch to `branch` and creates it upstream.
pub async fn push_repository(shell: &ShellRunner, message: &str, branch: &str) -> Result<PushStatus> {
    if let Err(e) = shell.git().args(["add", "-A", ":!./.config"]).run().await {
        tracing::warn!("Unable to stage files: {}", e);
    }

    if !has_staged_changes(shell).await? {
        tracing::debug!("No changes detected, returning no changes status");
        return Ok(PushStatus::NoChangesPushed);
    }

    shell.git().args(["commit", "-m", message]).run().await?;

    let first = match push_upstream(shell, branch).await {
        Ok(()) => return Ok(PushStatus::ChangesPushed),
        Err(e) => e,
    };

    if GitFailure::classify(&first.to_string()) == Some(GitFailure::UnmatchedRefspec) {
        tracing::info!("Empty repository detected, setting up initial branch and push");
        initialize_branch(shell, branch).await?;
        return Ok(PushStatus::ChangesPushed);
    }

    tracing::info!("First push failed, attempting rebase and retry: {}", first);
    let retry = async {
        shell.git().args(["pull", "--rebase"]).run().await?;
        push_upstream(shell, branch).await
    };
    match retry.await {
        Ok(()) => Ok(PushStatus::ChangesPushed),
        Err(e) if GitFailure::classify(&e.to_string()) == Some(GitFailure::MissingRemoteRef) => {
            tracing::info!("Retry failed due to empty repository, setting up initial branch and push");
            initialize_branch(shell, branch).await?;
            Ok(PushStatus::ChangesPushed)
        }
        Err(e) => Err(e),
    }
}

async fn push_upstream(shell: &ShellRunner, branch: &str) -> Result<()> {
    shell
        .git()
        .args(["push", "--set-upstream", "origin", branch])
        .run()
        .await?;
    Ok(())
}

async fn initialize_branch(shell: &ShellRunner, branch: &str) -> Result<()> {
    shell.git().args(["branch", "-M", branch]).run().await?;
    shell.git().args(["push", "-u", "origin", branch]).run().await?;
    tracing::info!("Initial push to {} branch succeeded", branch);
    Ok(())
}
