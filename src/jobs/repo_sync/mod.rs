//! `sync`: whole-repository synchronization and `wmill.yaml` settings operations
//!
//! Direction follows the UI's point of view: a *pull* brings git content into
//! the platform (CLI `sync push`), a *push* writes platform state to git (CLI
//! `sync pull`).

mod settings;
mod sync;

pub use settings::InitialSetup;

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::{authenticated_url, JobContext};
use crate::config::JobEnv;
use crate::error::{Error, Result};
use crate::git::{
    self, branch::is_forked_workspace, clone_repository, CloneRequest, PushStatus, SubfolderPolicy,
};
use crate::gpg::GpgSigner;
use crate::platform::{fetch_resource, strip_resource_prefix, GitRepository};
use crate::subprocess::ShellRunner;
use crate::wmill::{SettingsRequest, SyncDirection, WmillCli, SETTINGS_FILE};

#[derive(Debug, Clone, Default)]
pub struct SyncRequest {
    pub workspace_id: String,
    /// Path of the `git_repository` resource, optionally `$res:`-prefixed
    pub repository: String,
    pub dry_run: bool,
    pub only_wmill_yaml: bool,
    pub pull: bool,
    /// Git-sync settings from the UI, as JSON
    pub settings_json: Option<String>,
    /// Apply the promotion overrides of the repository's branch
    pub use_promotion_overrides: bool,
}

/// What a [`SyncRequest`] resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    /// Compare the repository's `wmill.yaml` with the platform settings
    SettingsFromGit,
    /// Preview writing platform settings into `wmill.yaml`
    SettingsToGitPreview,
    /// Write platform settings into `wmill.yaml` and push
    SettingsToGit,
    /// Preview applying the repository to the platform
    FromGitPreview,
    /// Apply the repository to the platform
    FromGit,
    /// Preview writing the platform state to the repository
    ToGitPreview,
    /// Write the platform state to the repository and push
    ToGit,
}

impl SyncOperation {
    pub fn plan(request: &SyncRequest) -> Self {
        match (request.only_wmill_yaml, request.pull, request.dry_run) {
            // Pulling settings only ever reports the diff
            (true, true, _) => SyncOperation::SettingsFromGit,
            (true, false, true) => SyncOperation::SettingsToGitPreview,
            (true, false, false) => SyncOperation::SettingsToGit,
            (false, true, true) => SyncOperation::FromGitPreview,
            (false, true, false) => SyncOperation::FromGit,
            (false, false, true) => SyncOperation::ToGitPreview,
            (false, false, false) => SyncOperation::ToGit,
        }
    }

    /// Label prefixed to this operation's failures
    pub fn label(&self) -> &'static str {
        match self {
            SyncOperation::SettingsFromGit => "Settings push dry run",
            SyncOperation::SettingsToGitPreview => "Settings pull dry run",
            SyncOperation::SettingsToGit => "Settings pull",
            SyncOperation::FromGitPreview => "Sync push dry run",
            SyncOperation::FromGit => "Sync push",
            SyncOperation::ToGitPreview => "Sync pull dry run",
            SyncOperation::ToGit => "Sync pull",
        }
    }
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Plain `{success, message}` job result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub success: bool,
    pub message: String,
}

impl Completion {
    pub fn new(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

/// State of one sync job after the clone
pub(crate) struct Session<'a> {
    pub shell: ShellRunner,
    pub signer: GpgSigner,
    pub cli: WmillCli,
    pub env: &'a JobEnv,
    pub repo: &'a GitRepository,
    pub workspace: &'a str,
    /// Resource path handed to the CLI
    pub repository: &'a str,
    pub settings_json: Option<&'a str>,
    pub promotion: Option<&'a str>,
    /// Branch pushes go to
    pub branch: String,
}

impl Session<'_> {
    pub fn has_settings_file(&self) -> bool {
        self.shell.cwd().join(SETTINGS_FILE).is_file()
    }

    pub fn settings_request(&self, direction: SyncDirection) -> SettingsRequest<'_> {
        SettingsRequest::new(direction, self.workspace, self.repository)
    }

    /// Commit everything in the clone and push it to the session branch
    pub async fn commit(&mut self, message: &str) -> Result<PushStatus> {
        git::configure_identity(&self.shell, self.env.email(), self.env.username()).await?;
        if let Some(key) = &self.repo.gpg_key {
            self.signer.configure(&mut self.shell, key).await?;
        }
        git::push_repository(&self.shell, message, &self.branch).await
    }

    async fn run(&mut self, operation: SyncOperation) -> Result<Value> {
        match operation {
            SyncOperation::SettingsFromGit => settings::compare_with_git(self).await,
            SyncOperation::SettingsToGitPreview => settings::preview_write(self).await,
            SyncOperation::SettingsToGit => settings::write(self).await,
            SyncOperation::FromGitPreview => sync::preview_from_git(self).await,
            SyncOperation::FromGit => sync::from_git(self).await,
            SyncOperation::ToGitPreview => sync::preview_to_git(self).await,
            SyncOperation::ToGit => sync::to_git(self).await,
        }
    }
}

pub async fn sync_repository(ctx: &JobContext, request: &SyncRequest) -> Result<Value> {
    let operation = SyncOperation::plan(request);
    tracing::info!(
        "Starting {} for workspace {} (settings provided: {})",
        operation,
        request.workspace_id,
        request.settings_json.is_some()
    );

    let repo: GitRepository = fetch_resource(ctx.platform.as_ref(), &request.repository).await?;
    tracing::debug!(
        "Repository branch {:?}, folder {:?}, github app {}, gpg {}",
        repo.branch(),
        repo.folder(),
        repo.is_github_app,
        repo.gpg_key.is_some()
    );
    let repository = strip_resource_prefix(&request.repository);
    let promotion = repo.branch().filter(|_| request.use_promotion_overrides);

    if operation == SyncOperation::SettingsToGit && request.settings_json.is_none() {
        return Err(Error::Sync("settings_json required in this mode".to_string()));
    }

    let mut shell = ctx.shell();
    let mut clone = CloneRequest::new(authenticated_url(ctx, &repo, &mut shell).await?);
    clone.branch = repo.branch.clone();
    clone.subfolder = repo.folder.clone();
    clone.no_single_branch = is_forked_workspace(&request.workspace_id);
    clone.retry_without_branch = true;
    clone.subfolder_policy = if request.pull {
        SubfolderPolicy::Require
    } else {
        SubfolderPolicy::Create
    };
    clone.workspace_id = Some(request.workspace_id.clone());

    let cloned = clone_repository(&mut shell, &clone).await?;
    let Some(branch) = cloned.branch.clone() else {
        cloned.release(&shell).await;
        return Err(Error::Sync("could not determine the cloned branch".to_string()));
    };

    let mut session = Session {
        shell,
        signer: GpgSigner::new(&ctx.config.gpg_home),
        cli: ctx.wmill(),
        env: &ctx.env,
        repo: &repo,
        workspace: &request.workspace_id,
        repository,
        settings_json: request.settings_json.as_deref(),
        promotion,
        branch,
    };

    let result: Result<Value> = async {
        session
            .cli
            .workspace_add(&session.shell, session.workspace)
            .await?;
        session.run(operation).await
    }
    .await;

    session.signer.cleanup(&session.shell).await;
    cloned.release(&session.shell).await;

    let value = result?;
    tracing::debug!("{} completed", operation);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(only_wmill_yaml: bool, pull: bool, dry_run: bool) -> SyncRequest {
        SyncRequest {
            only_wmill_yaml,
            pull,
            dry_run,
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_covers_every_flag_combination() {
        use SyncOperation::*;
        let cases = [
            ((true, true, true), SettingsFromGit),
            ((true, true, false), SettingsFromGit),
            ((true, false, true), SettingsToGitPreview),
            ((true, false, false), SettingsToGit),
            ((false, true, true), FromGitPreview),
            ((false, true, false), FromGit),
            ((false, false, true), ToGitPreview),
            ((false, false, false), ToGit),
        ];
        for ((only, pull, dry), expected) in cases {
            assert_eq!(SyncOperation::plan(&request(only, pull, dry)), expected);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(SyncOperation::ToGit.to_string(), "Sync pull");
        assert_eq!(SyncOperation::SettingsFromGit.label(), "Settings push dry run");
    }
}
