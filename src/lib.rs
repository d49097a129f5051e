//! # gitsync
//!
//! Git synchronization jobs for a workflow platform: commit single items or
//! whole workspaces to a git repository, or apply a repository back to the
//! platform, with optional GPG signing and GitHub App / Azure DevOps
//! credentials.
//!
//! ## Usage
//!
//! ```bash
//! gitsync push-item -r f/git/repo -t flow -p f/team/etl -m "Update etl"
//! gitsync sync -r '$res:f/git/repo' --pull --dry-run
//! ```
//!
//! ## Modules
//!
//! - `subprocess` - Process runner abstraction with secret redaction
//! - `git` - Clone, branch and push operations
//! - `gpg` - Commit signing key lifecycle
//! - `wmill` - Workflow CLI invocation and output parsing
//! - `platform` - Platform API and Azure identity clients
//! - `jobs` - The job entry points
//! - `testing` - In-memory collaborators for tests
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod gpg;
pub mod jobs;
pub mod platform;
pub mod subprocess;
pub mod wmill;

pub mod testing;
