//! Command routing and execution

use anyhow::{Context, Result};
use serde_json::Value;

use crate::cli::args::{Commands, PushItemArgs, SyncArgs};
use crate::config::{GitSyncConfig, JobEnv};
use crate::jobs::{self, JobContext, PushItemRequest, SyncRequest};

/// Run a command and return the JSON it prints
pub async fn execute_command(command: Commands, config: GitSyncConfig) -> Result<Value> {
    match command {
        // Runs outside a platform job, so it needs no job context
        Commands::FetchTodo { id } => Ok(jobs::fetch_todo(&config, id).await?),
        command => {
            let ctx = JobContext::production(config, JobEnv::from_env())?;
            run_job(&ctx, command).await
        }
    }
}

/// Run a command against an existing job context
pub async fn run_job(ctx: &JobContext, command: Commands) -> Result<Value> {
    match command {
        Commands::PushItem(args) => {
            let request = push_item_request(ctx, args)?;
            let outcome = jobs::push_item(ctx, &request).await?;
            Ok(serde_json::to_value(outcome)?)
        }
        Commands::Sync(args) => {
            let request = sync_request(ctx, args)?;
            Ok(jobs::sync_repository(ctx, &request).await?)
        }
        Commands::GetVariable { path } => Ok(jobs::get_variable(ctx, &path).await?),
        Commands::FetchTodo { id } => Ok(jobs::fetch_todo(&ctx.config, id).await?),
    }
}

fn workspace_id(ctx: &JobContext, explicit: Option<String>) -> Result<String> {
    explicit
        .or_else(|| ctx.env.workspace.clone())
        .context("no workspace id given and WM_WORKSPACE is not set")
}

fn push_item_request(ctx: &JobContext, args: PushItemArgs) -> Result<PushItemRequest> {
    Ok(PushItemRequest {
        workspace_id: workspace_id(ctx, args.workspace_id)?,
        repository: args.repository,
        path_type: args.path_type,
        skip_secrets: args.skip_secrets,
        path: args.path,
        parent_path: args.parent_path,
        commit_message: args.commit_message,
        use_individual_branch: args.use_individual_branch,
        group_by_folder: args.group_by_folder,
    })
}

fn sync_request(ctx: &JobContext, args: SyncArgs) -> Result<SyncRequest> {
    Ok(SyncRequest {
        workspace_id: workspace_id(ctx, args.workspace_id)?,
        repository: args.repository,
        dry_run: args.dry_run,
        only_wmill_yaml: args.only_wmill_yaml,
        pull: args.pull,
        settings_json: args.settings_json,
        use_promotion_overrides: args.use_promotion_overrides,
    })
}
