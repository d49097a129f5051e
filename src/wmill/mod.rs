//! Workflow CLI (`wmill`) invocation
//!
//! Each operation assembles a [`WmillArgs`] list, runs the CLI through the
//! job's [`ShellRunner`] with the token redacted, and scrapes the JSON result
//! from its stdout when one is expected.

mod args;
mod output;
mod path_type;

pub use args::WmillArgs;
pub use output::{extract_json, Change, SettingsDiff, SyncChanges};
pub use path_type::{include_glob, PathType};

use serde_json::Value;

use crate::error::Result;
use crate::subprocess::ShellRunner;

/// Sync settings file at the root of the synced tree
pub const SETTINGS_FILE: &str = "wmill.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    /// Platform to local files
    Pull,
    /// Local files to platform
    Push,
}

impl SyncDirection {
    fn as_str(&self) -> &'static str {
        match self {
            SyncDirection::Pull => "pull",
            SyncDirection::Push => "push",
        }
    }
}

/// How `gitsync-settings pull` treats an existing `wmill.yaml`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsMerge {
    Override,
    Replace,
}

impl SettingsMerge {
    fn flag(&self) -> &'static str {
        match self {
            SettingsMerge::Override => "--override",
            SettingsMerge::Replace => "--replace",
        }
    }
}

/// `gitsync-settings pull|push` invocation
#[derive(Debug, Clone)]
pub struct SettingsRequest<'a> {
    pub direction: SyncDirection,
    pub workspace: &'a str,
    pub repository: &'a str,
    pub diff: bool,
    pub merge: Option<SettingsMerge>,
    pub backend_settings: Option<&'a str>,
    pub promotion: Option<&'a str>,
    pub json_output: bool,
}

impl<'a> SettingsRequest<'a> {
    pub fn new(direction: SyncDirection, workspace: &'a str, repository: &'a str) -> Self {
        Self {
            direction,
            workspace,
            repository,
            diff: false,
            merge: None,
            backend_settings: None,
            promotion: None,
            json_output: false,
        }
    }
}

/// Single-item `sync pull` into the clone
#[derive(Debug, Clone, Default)]
pub struct ItemPullRequest<'a> {
    pub workspace: &'a str,
    pub repository: &'a str,
    pub skip_secrets: bool,
    pub include_settings: bool,
    pub include_key: bool,
    pub extra_includes: Vec<String>,
    pub promotion: Option<&'a str>,
}

/// Connection details shared by every invocation
#[derive(Debug, Clone)]
pub struct WmillCli {
    token: String,
    base_url: String,
}

impl WmillCli {
    /// `base_url` is passed verbatim; the CLI expects a trailing slash.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into(),
        }
    }

    /// Run the CLI and return its stdout
    pub async fn run(&self, shell: &ShellRunner, args: &WmillArgs) -> Result<String> {
        let mut command = shell.wmill().args(args.as_slice());
        if let Some(position) = args.secret_position() {
            command = command.secret(position as isize);
        }
        command.run().await
    }

    /// Run the CLI and scrape its JSON result
    pub async fn run_json(&self, shell: &ShellRunner, args: &WmillArgs) -> Result<Value> {
        let output = self.run(shell, args).await?;
        Ok(extract_json(&output))
    }

    /// Register the workspace in the CLI's local profile
    pub async fn workspace_add(&self, shell: &ShellRunner, workspace: &str) -> Result<()> {
        let args = WmillArgs::new(["workspace", "add", workspace, workspace, &self.base_url])
            .token(&self.token);
        self.run(shell, &args).await?;
        Ok(())
    }

    /// Write a default `wmill.yaml` in the current directory
    pub async fn init_default(&self, shell: &ShellRunner, workspace: &str) -> Result<()> {
        let args = WmillArgs::new(["init", "--use-default"])
            .token(&self.token)
            .option("--base-url", Some(&self.base_url))
            .option("--workspace", Some(workspace));
        self.run(shell, &args).await?;
        Ok(())
    }

    pub async fn pull_items(&self, shell: &ShellRunner, request: &ItemPullRequest<'_>) -> Result<()> {
        let args = WmillArgs::new(["sync", "pull"])
            .token(&self.token)
            .option("--workspace", Some(request.workspace))
            .option("--repository", Some(request.repository))
            .arg("--yes")
            .flag("--skip-secrets", request.skip_secrets)
            .args([
                "--include-schedules",
                "--include-users",
                "--include-groups",
                "--include-triggers",
            ])
            .flag("--include-settings", request.include_settings)
            .flag("--include-key", request.include_key)
            .arg("--extra-includes")
            .arg(request.extra_includes.join(","))
            .option("--promotion", request.promotion);
        self.run(shell, &args).await?;
        Ok(())
    }

    /// Whole-workspace `sync pull|push`.
    ///
    /// A dry run reports the pending changes as JSON; an applied sync answers
    /// with JSON only for pushes.
    pub async fn sync(
        &self,
        shell: &ShellRunner,
        direction: SyncDirection,
        workspace: &str,
        repository: &str,
        dry_run: bool,
    ) -> Result<Value> {
        let args = WmillArgs::new(["sync", direction.as_str()])
            .flag("--dry-run", dry_run)
            .flag("--yes", !dry_run)
            .flag(
                "--json-output",
                dry_run || direction == SyncDirection::Push,
            )
            .option("--workspace", Some(workspace))
            .token(&self.token)
            .option("--base-url", Some(&self.base_url))
            .option("--repository", Some(repository));
        self.run_json(shell, &args).await
    }

    pub async fn settings(&self, shell: &ShellRunner, request: &SettingsRequest<'_>) -> Result<Value> {
        let args = WmillArgs::new(["gitsync-settings", request.direction.as_str()])
            .flag("--diff", request.diff)
            .option("--repository", Some(request.repository))
            .option("--workspace", Some(request.workspace))
            .arg(request.merge.map(|m| m.flag()).unwrap_or_default())
            .option("--with-backend-settings", request.backend_settings)
            .option("--promotion", request.promotion)
            .token(&self.token)
            .option("--base-url", Some(&self.base_url))
            .flag("--json-output", request.json_output);
        self.run_json(shell, &args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolPaths;
    use crate::subprocess::MockProcessRunner;
    use std::sync::Arc;

    fn shell(mock: &MockProcessRunner) -> ShellRunner {
        ShellRunner::new(Arc::new(mock.clone()), ToolPaths::default(), std::env::temp_dir())
    }

    fn cli() -> WmillCli {
        WmillCli::new("wm_secret_token", "http://localhost:8000/")
    }

    #[tokio::test]
    async fn test_pull_items_arguments() {
        let mock = MockProcessRunner::permissive();
        let request = ItemPullRequest {
            workspace: "prod",
            repository: "f/git/repo",
            skip_secrets: true,
            include_settings: false,
            include_key: true,
            extra_includes: vec!["f/a.flow/*".to_string(), "f.*".to_string()],
            promotion: Some("main"),
        };
        cli().pull_items(&shell(&mock), &request).await.unwrap();

        assert!(mock.was_called_with(
            "wmill",
            &[
                "sync",
                "pull",
                "--token",
                "wm_secret_token",
                "--workspace",
                "prod",
                "--repository",
                "f/git/repo",
                "--yes",
                "--skip-secrets",
                "--include-schedules",
                "--include-users",
                "--include-groups",
                "--include-triggers",
                "--include-key",
                "--extra-includes",
                "f/a.flow/*,f.*",
                "--promotion",
                "main",
            ]
        ));
    }

    #[tokio::test]
    async fn test_sync_dry_run_parses_json() {
        let mut mock = MockProcessRunner::new();
        mock.expect_command("wmill")
            .returns_stdout("Checking...\n{\"changes\":[],\"total\":0}")
            .finish();

        let value = cli()
            .sync(&shell(&mock), SyncDirection::Pull, "prod", "f/git/repo", true)
            .await
            .unwrap();

        assert_eq!(value, serde_json::json!({"changes": [], "total": 0}));
        assert!(mock.was_called_with(
            "wmill",
            &[
                "sync",
                "pull",
                "--dry-run",
                "--json-output",
                "--workspace",
                "prod",
                "--token",
                "wm_secret_token",
                "--base-url",
                "http://localhost:8000/",
                "--repository",
                "f/git/repo",
            ]
        ));
    }

    #[tokio::test]
    async fn test_settings_arguments() {
        let mock = MockProcessRunner::permissive();
        let mut request = SettingsRequest::new(SyncDirection::Pull, "prod", "f/git/repo");
        request.diff = true;
        request.merge = Some(SettingsMerge::Override);
        request.backend_settings = Some("{\"include_path\":[\"f/**\"]}");
        request.json_output = true;

        cli().settings(&shell(&mock), &request).await.unwrap();

        assert!(mock.was_called_with(
            "wmill",
            &[
                "gitsync-settings",
                "pull",
                "--diff",
                "--repository",
                "f/git/repo",
                "--workspace",
                "prod",
                "--override",
                "--with-backend-settings",
                "{\"include_path\":[\"f/**\"]}",
                "--token",
                "wm_secret_token",
                "--base-url",
                "http://localhost:8000/",
                "--json-output",
            ]
        ));
    }

    #[tokio::test]
    async fn test_cli_failure_redacts_token() {
        let mut mock = MockProcessRunner::new();
        mock.expect_command("wmill")
            .returns_exit_code(1)
            .returns_stderr("Unauthorized: token wm_secret_token is invalid")
            .finish();

        let err = cli().workspace_add(&shell(&mock), "prod").await.unwrap_err();
        assert!(!err.to_string().contains("wm_secret_token"));
        assert!(err.to_string().contains("workspace add prod prod"));
    }
}
