//! Job entry points
//!
//! Each job is a flat sequence of awaits against a [`JobContext`]: resolve the
//! repository resource, clone, run the workflow CLI, commit and push, then
//! release the temporary state whatever the outcome.

mod auth;
mod context;
mod fetch_todo;
mod item_sync;
mod repo_sync;
mod variable;

pub use auth::authenticated_url;
pub use context::JobContext;
pub use fetch_todo::{fetch_todo, DEFAULT_TODO_ID};
pub use item_sync::{push_item, PushItemRequest};
pub use repo_sync::{sync_repository, Completion, InitialSetup, SyncOperation, SyncRequest};
pub use variable::get_variable;
