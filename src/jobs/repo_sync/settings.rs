//! `wmill.yaml`-only operations

use serde::Serialize;
use serde_json::Value;

use super::{Completion, Session, SyncOperation};
use crate::error::{Error, Result};
use crate::git::GitFailure;
use crate::wmill::{SettingsMerge, SyncDirection};

/// Result for a repository that has no `wmill.yaml` yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialSetup {
    pub success: bool,
    pub has_changes: bool,
    pub message: String,
    pub is_initial_setup: bool,
    pub repository: String,
}

impl InitialSetup {
    pub fn new(message: &str, repository: &str) -> Self {
        Self {
            success: true,
            has_changes: true,
            message: message.to_string(),
            is_initial_setup: true,
            repository: repository.to_string(),
        }
    }
}

/// Diff the repository's settings against the platform's (`gitsync-settings push --diff`)
pub(super) async fn compare_with_git(session: &mut Session<'_>) -> Result<Value> {
    let result: Result<Value> = async {
        if !session.has_settings_file() {
            return Err(Error::Sync(
                "No wmill.yaml found in the git repository. Please initialize the repository first by pushing settings from Windmill to git."
                    .to_string(),
            ));
        }
        let mut request = session.settings_request(SyncDirection::Push);
        request.diff = true;
        request.backend_settings = session.settings_json;
        request.promotion = session.promotion;
        request.json_output = true;
        session.cli.settings(&session.shell, &request).await
    }
    .await;
    result.map_err(|e| e.during(SyncOperation::SettingsFromGit.label()))
}

/// Preview what writing platform settings would change in `wmill.yaml`
pub(super) async fn preview_write(session: &mut Session<'_>) -> Result<Value> {
    if !session.has_settings_file() {
        tracing::info!("No wmill.yaml found, will create with repository settings");
        return to_value(InitialSetup::new(
            "wmill.yaml will be created with repository settings",
            session.repository,
        ));
    }

    let mut request = session.settings_request(SyncDirection::Pull);
    request.diff = true;
    request.merge = Some(SettingsMerge::Override);
    request.backend_settings = session.settings_json;
    request.promotion = session.promotion;
    request.json_output = true;

    match session.cli.settings(&session.shell, &request).await {
        Ok(value) => Ok(value),
        Err(e) if GitFailure::is_empty_remote(&e.to_string()) => {
            tracing::info!("Empty repository detected, branch doesn't exist or no commits");
            to_value(InitialSetup::new(
                "Empty repository detected - requires initialization",
                session.repository,
            ))
        }
        Err(e) => Err(e.during(SyncOperation::SettingsToGitPreview.label())),
    }
}

/// Write platform settings into `wmill.yaml` and push the result
pub(super) async fn write(session: &mut Session<'_>) -> Result<Value> {
    let result: Result<Value> = async {
        let existed = session.has_settings_file();
        if !existed {
            tracing::info!("No wmill.yaml found, initializing with default settings");
            session
                .cli
                .init_default(&session.shell, session.workspace)
                .await?;
        }

        let mut request = session.settings_request(SyncDirection::Pull);
        request.merge = Some(if existed {
            SettingsMerge::Override
        } else {
            SettingsMerge::Replace
        });
        request.backend_settings = session.settings_json;
        request.promotion = session.promotion;
        let pulled = session.cli.settings(&session.shell, &request).await?;
        tracing::debug!("Settings pull result: {}", pulled);

        let status = session.commit("Update wmill.yaml via settings").await?;
        tracing::info!("Git push completed: {:?}", status);
        to_value(Completion::new("Settings pushed to git successfully"))
    }
    .await;
    result.map_err(|e| e.during(SyncOperation::SettingsToGit.label()))
}

fn to_value<T: Serialize>(result: T) -> Result<Value> {
    Ok(serde_json::to_value(result)?)
}
