use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::GitSyncConfig;
use crate::error::{Error, Result};

pub const DEFAULT_TODO_ID: u64 = 3;

/// `fetch-todo`: GET `<todo base>/todos/<id>` and return the decoded body
pub async fn fetch_todo(config: &GitSyncConfig, id: u64) -> Result<Value> {
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

    let url = format!("{}/todos/{}", config.todo_base_url.trim_end_matches('/'), id);
    tracing::debug!("GET {}", url);
    let response = client
        .get(&url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .send()
        .await?;

    Ok(response.json().await?)
}
