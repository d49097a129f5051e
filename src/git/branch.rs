//! Branch naming and switching

use crate::error::{Error, Result};
use crate::subprocess::ShellRunner;
use crate::wmill::PathType;

pub const FORKED_WORKSPACE_PREFIX: &str = "wm-fork-";
pub const FORKED_BRANCH_PREFIX: &str = "wm-fork";
pub const DEPLOY_BRANCH_PREFIX: &str = "wm_deploy";

pub fn is_forked_workspace(workspace_id: &str) -> bool {
    workspace_id.starts_with(FORKED_WORKSPACE_PREFIX)
}

/// Branch tracking a forked workspace: `wm-fork-<rest>` maps to
/// `wm-fork/<original branch>/<rest>`; other ids come back unchanged.
pub fn fork_branch_name(workspace_id: &str, original_branch: &str) -> String {
    match workspace_id.strip_prefix(FORKED_WORKSPACE_PREFIX) {
        Some(rest) => format!("{}/{}/{}", FORKED_BRANCH_PREFIX, original_branch, rest),
        None => workspace_id.to_string(),
    }
}

/// Per-item deploy branch.
///
/// Without folder grouping: `wm_deploy/<ws>/<type>/<path with / as __>`.
/// With folder grouping: `wm_deploy/<ws>/<first two segments joined by __>`.
pub fn deploy_branch_name(
    workspace_id: &str,
    path_type: PathType,
    item_path: &str,
    group_by_folder: bool,
) -> String {
    if group_by_folder {
        let folder = item_path.split('/').take(2).collect::<Vec<_>>().join("__");
        format!("{}/{}/{}", DEPLOY_BRANCH_PREFIX, workspace_id, folder)
    } else {
        format!(
            "{}/{}/{}/{}",
            DEPLOY_BRANCH_PREFIX,
            workspace_id,
            path_type,
            item_path.replace('/', "__")
        )
    }
}

/// Switch to `branch`, creating it (with push auto-upstream) when it does not exist yet.
pub async fn checkout_or_create(shell: &ShellRunner, branch: &str) -> Result<()> {
    if let Err(e) = shell.git().args(["checkout", branch]).run().await {
        tracing::info!(
            "Error checking out branch {}. It is possible it doesn't exist yet, tentatively creating it... Error was:\n{}",
            branch,
            e
        );
        shell.git().args(["checkout", "-b", branch]).run().await?;
        shell
            .git()
            .args(["config", "--add", "--bool", "push.autoSetupRemote", "true"])
            .run()
            .await?;
    }
    tracing::info!("Successfully switched to branch {}", branch);
    Ok(())
}

/// Create the fork branch, or switch to it if a previous sync already created it.
pub async fn create_or_switch(shell: &ShellRunner, branch: &str) -> Result<()> {
    if shell.git().args(["checkout", "-b", branch]).run().await.is_err() {
        tracing::info!("Could not create branch, trying to switch to existing branch");
        shell.git().args(["checkout", branch]).run().await?;
    }
    Ok(())
}

/// Move onto the item's deploy branch when individual branches are requested.
///
/// Users and groups are workspace-wide and always stay on the cloned branch.
pub async fn move_to_deploy_branch(
    shell: &ShellRunner,
    workspace_id: &str,
    path_type: PathType,
    path: Option<&str>,
    parent_path: Option<&str>,
    use_individual_branch: bool,
    group_by_folder: bool,
) -> Result<Option<String>> {
    if !use_individual_branch || matches!(path_type, PathType::User | PathType::Group) {
        return Ok(None);
    }

    let item_path = path.or(parent_path).ok_or_else(|| {
        Error::Config("an item path or parent path is required for individual branches".to_string())
    })?;
    let branch = deploy_branch_name(workspace_id, path_type, item_path, group_by_folder);
    checkout_or_create(shell, &branch).await?;
    Ok(Some(branch))
}
