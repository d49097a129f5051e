//! `push-item`: write one platform item (and its parent) to git

use super::{authenticated_url, JobContext};
use crate::error::Result;
use crate::git::{
    self, branch::move_to_deploy_branch, clone_repository, Author, CloneRequest, PushOutcome,
    SubfolderPolicy,
};
use crate::gpg::GpgSigner;
use crate::platform::{fetch_resource, GitRepository};
use crate::subprocess::ShellRunner;
use crate::wmill::{ItemPullRequest, PathType};

#[derive(Debug, Clone)]
pub struct PushItemRequest {
    pub workspace_id: String,
    /// Path of the `git_repository` resource
    pub repository: String,
    pub path_type: PathType,
    pub skip_secrets: bool,
    pub path: Option<String>,
    pub parent_path: Option<String>,
    pub commit_message: String,
    pub use_individual_branch: bool,
    pub group_by_folder: bool,
}

impl PushItemRequest {
    fn item_paths(&self) -> Vec<&str> {
        [self.path.as_deref(), self.parent_path.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect()
    }
}

pub async fn push_item(ctx: &JobContext, request: &PushItemRequest) -> Result<PushOutcome> {
    let repo: GitRepository = fetch_resource(ctx.platform.as_ref(), &request.repository).await?;
    tracing::info!(
        "Syncing {} {} with parent {}",
        request.path_type,
        request.path.as_deref().unwrap_or(""),
        request.parent_path.as_deref().unwrap_or("")
    );

    let mut shell = ctx.shell();
    let mut clone = CloneRequest::new(authenticated_url(ctx, &repo, &mut shell).await?);
    clone.branch = repo.branch.clone();
    clone.subfolder = repo.folder.clone();
    // The deploy branch may already exist upstream
    clone.no_single_branch = request.use_individual_branch;
    clone.subfolder_policy = SubfolderPolicy::Require;

    let cloned = clone_repository(&mut shell, &clone).await?;

    let mut signer = GpgSigner::new(&ctx.config.gpg_home);
    let result = sync_and_push(ctx, request, &repo, &mut shell, &mut signer).await;

    signer.cleanup(&shell).await;
    cloned.release(&shell).await;

    let status = result?;
    tracing::info!("Finished syncing");
    Ok(status.into())
}

async fn sync_and_push(
    ctx: &JobContext,
    request: &PushItemRequest,
    repo: &GitRepository,
    shell: &mut ShellRunner,
    signer: &mut GpgSigner,
) -> Result<git::PushStatus> {
    move_to_deploy_branch(
        shell,
        &request.workspace_id,
        request.path_type,
        request.path.as_deref(),
        request.parent_path.as_deref(),
        request.use_individual_branch,
        request.group_by_folder,
    )
    .await?;

    tracing::info!(
        "Pushing to repository {} in subfolder {} on branch {}",
        git::repo_name(&repo.url),
        repo.folder().unwrap_or(""),
        repo.branch().unwrap_or("<DEFAULT>")
    );

    let cli = ctx.wmill();
    cli.workspace_add(shell, &request.workspace_id).await?;

    let individual = request.use_individual_branch;
    let pull = ItemPullRequest {
        workspace: &request.workspace_id,
        repository: &request.repository,
        skip_secrets: request.skip_secrets,
        include_settings: request.path_type == PathType::Settings && !individual,
        include_key: request.path_type == PathType::Key && !individual,
        extra_includes: request
            .item_paths()
            .into_iter()
            .map(|p| request.path_type.include_glob(p))
            .collect(),
        promotion: repo.branch().filter(|_| individual),
    };
    if let Some(branch) = pull.promotion {
        tracing::info!(
            "Individual branch deployment detected, using promotion settings from '{}'",
            branch
        );
    }
    tracing::info!("Pulling workspace into git repo");
    cli.pull_items(shell, &pull).await?;

    let committer_email = match &repo.gpg_key {
        Some(key) => {
            if let Err(e) = signer.configure(shell, key).await {
                tracing::error!("Failure while setting GPG key: {}", e);
                signer.cleanup(shell).await;
            }
            key.email.clone()
        }
        None => ctx.env.email().to_string(),
    };
    git::configure_identity(shell, &committer_email, ctx.env.username()).await?;

    let author = Author {
        name: ctx.env.username().to_string(),
        email: ctx.env.email().to_string(),
    };
    git::push_item(shell, &request.item_paths(), &author, &request.commit_message).await
}
