//! CLI argument structures

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::jobs::DEFAULT_TODO_ID;
use crate::wmill::PathType;

/// Keep workflow-platform workspaces in sync with git repositories
#[derive(Parser)]
#[command(name = "gitsync")]
#[command(about = "gitsync - Synchronize platform workspaces with git repositories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Commit one platform item (and its parent) to the workspace's repository
    #[command(name = "push-item")]
    PushItem(PushItemArgs),

    /// Synchronize the whole workspace, or only wmill.yaml, with its repository
    #[command(name = "sync")]
    Sync(SyncArgs),

    /// Print the value of a workspace variable
    #[command(name = "get-variable")]
    GetVariable {
        /// Variable path (e.g. u/admin/db_password)
        path: String,
    },

    /// Fetch a sample JSON document over HTTP
    #[command(name = "fetch-todo")]
    FetchTodo {
        /// Todo id
        #[arg(default_value_t = DEFAULT_TODO_ID)]
        id: u64,
    },
}

#[derive(Args, Debug)]
pub struct PushItemArgs {
    /// Workspace id (defaults to WM_WORKSPACE)
    #[arg(short = 'w', long)]
    pub workspace_id: Option<String>,

    /// Path of the git_repository resource
    #[arg(short = 'r', long)]
    pub repository: String,

    /// Kind of item being synced
    #[arg(short = 't', long, value_name = "TYPE")]
    pub path_type: PathType,

    /// Leave secret variable values out of the commit
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub skip_secrets: bool,

    /// Item path
    #[arg(short = 'p', long)]
    pub path: Option<String>,

    /// Previous path of a renamed item, or the parent of a nested item
    #[arg(long)]
    pub parent_path: Option<String>,

    /// Commit message
    #[arg(short = 'm', long, default_value = "")]
    pub commit_message: String,

    /// Push to a dedicated deploy branch instead of the repository branch
    #[arg(long)]
    pub use_individual_branch: bool,

    /// Share one deploy branch per folder
    #[arg(long)]
    pub group_by_folder: bool,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Workspace id (defaults to WM_WORKSPACE)
    #[arg(short = 'w', long)]
    pub workspace_id: Option<String>,

    /// Path of the git_repository resource, optionally $res:-prefixed
    #[arg(short = 'r', long)]
    pub repository: String,

    /// Report what would change without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Only synchronize wmill.yaml
    #[arg(long)]
    pub only_wmill_yaml: bool,

    /// Bring the repository into the platform instead of writing to it
    #[arg(long)]
    pub pull: bool,

    /// Git-sync settings as JSON
    #[arg(long, value_name = "JSON")]
    pub settings_json: Option<String>,

    /// Apply the promotion overrides of the repository's branch
    #[arg(long)]
    pub use_promotion_overrides: bool,
}
