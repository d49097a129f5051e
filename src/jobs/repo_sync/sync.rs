//! Full workspace sync in both directions

use serde_json::Value;

use super::{Completion, Session, SyncOperation};
use crate::error::Result;
use crate::wmill::{Change, SettingsDiff, SettingsMerge, SyncChanges, SyncDirection, SETTINGS_FILE};

fn settings_diff(value: Value) -> SettingsDiff {
    serde_json::from_value(value).unwrap_or_default()
}

fn sync_changes(value: Value) -> Result<SyncChanges> {
    Ok(serde_json::from_value(value)?)
}

/// Preview applying the repository to the platform, settings diff included
pub(super) async fn preview_from_git(session: &mut Session<'_>) -> Result<Value> {
    let result: Result<Value> = async {
        let mut request = session.settings_request(SyncDirection::Push);
        request.diff = true;
        request.json_output = true;
        request.backend_settings = session.settings_json;
        request.promotion = session.promotion;
        let diff = settings_diff(session.cli.settings(&session.shell, &request).await?);

        let preview = session
            .cli
            .sync(
                &session.shell,
                SyncDirection::Push,
                session.workspace,
                session.repository,
                true,
            )
            .await?;
        let mut changes = sync_changes(preview)?;
        if diff.has_changes {
            tracing::info!("Settings would change, attaching settings diff");
            changes.settings_diff = Some(diff);
        }
        Ok(serde_json::to_value(changes)?)
    }
    .await;
    result.map_err(|e| e.during(SyncOperation::FromGitPreview.label()))
}

/// Apply the repository to the platform.
///
/// The result carries the repository's settings as `settings_json` so the
/// caller can apply them too.
pub(super) async fn from_git(session: &mut Session<'_>) -> Result<Value> {
    let result: Result<Value> = async {
        let mut request = session.settings_request(SyncDirection::Push);
        request.diff = true;
        request.json_output = true;
        let diff = settings_diff(session.cli.settings(&session.shell, &request).await?);

        let synced = session
            .cli
            .sync(
                &session.shell,
                SyncDirection::Push,
                session.workspace,
                session.repository,
                false,
            )
            .await?;

        let mut merged = match synced {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        if let Value::Object(completion) =
            serde_json::to_value(Completion::new("CLI sync push completed"))?
        {
            merged.extend(completion);
        }
        if let Some(local) = diff.local {
            merged.insert("settings_json".to_string(), local);
        }
        Ok(Value::Object(merged))
    }
    .await;
    result.map_err(|e| e.during(SyncOperation::FromGit.label()))
}

/// Create `wmill.yaml` from the platform settings when the repository has none.
///
/// Returns whether the file existed and the settings diff computed against it.
async fn ensure_settings_file(session: &mut Session<'_>) -> Result<(bool, SettingsDiff)> {
    if session.has_settings_file() {
        let mut request = session.settings_request(SyncDirection::Pull);
        request.diff = true;
        request.merge = Some(SettingsMerge::Override);
        request.backend_settings = session.settings_json;
        request.json_output = true;
        let diff = settings_diff(session.cli.settings(&session.shell, &request).await?);
        return Ok((true, diff));
    }

    tracing::info!("No wmill.yaml found, initializing with default settings");
    session
        .cli
        .init_default(&session.shell, session.workspace)
        .await?;

    let mut request = session.settings_request(SyncDirection::Pull);
    request.diff = true;
    request.merge = Some(SettingsMerge::Replace);
    request.backend_settings = session.settings_json;
    request.json_output = true;
    let diff = settings_diff(session.cli.settings(&session.shell, &request).await?);
    tracing::debug!("Settings diff: {:?}", diff);

    let mut request = session.settings_request(SyncDirection::Pull);
    request.merge = Some(SettingsMerge::Replace);
    request.backend_settings = session.settings_json;
    session.cli.settings(&session.shell, &request).await?;
    tracing::info!("Git-sync settings pulled successfully");

    Ok((false, diff))
}

/// Preview writing the platform state to the repository.
///
/// `wmill.yaml` is reported as added when it had to be created, or as edited
/// when the platform settings differ from it.
pub(super) async fn preview_to_git(session: &mut Session<'_>) -> Result<Value> {
    let result: Result<Value> = async {
        let (existed, diff) = ensure_settings_file(session).await?;

        let preview = session
            .cli
            .sync(
                &session.shell,
                SyncDirection::Pull,
                session.workspace,
                session.repository,
                true,
            )
            .await?;
        let mut changes = sync_changes(preview)?;

        if !changes.mentions(SETTINGS_FILE) {
            if !existed {
                changes.push_change(Change::new("added", SETTINGS_FILE));
            } else if diff.has_changes {
                tracing::info!("Adding wmill.yaml as modified due to settings changes");
                changes.push_change(Change::new("edited", SETTINGS_FILE));
            }
        }
        Ok(serde_json::to_value(changes)?)
    }
    .await;
    result.map_err(|e| e.during(SyncOperation::ToGitPreview.label()))
}

/// Write the platform state to the repository and push it
pub(super) async fn to_git(session: &mut Session<'_>) -> Result<Value> {
    let result: Result<Value> = async {
        if !session.has_settings_file() {
            ensure_settings_file(session).await?;
        }

        session
            .cli
            .sync(
                &session.shell,
                SyncDirection::Pull,
                session.workspace,
                session.repository,
                false,
            )
            .await?;

        let status = session.commit("Initialize windmill sync repo").await?;
        tracing::info!("Git push completed: {:?}", status);
        Ok(serde_json::to_value(Completion::new("CLI sync pull completed"))?)
    }
    .await;
    result.map_err(|e| e.during(SyncOperation::ToGit.label()))
}
