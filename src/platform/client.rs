use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::{strip_resource_prefix, PlatformApi};
use crate::config::JobEnv;
use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
struct GithubTokenRequest<'a> {
    job_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct GithubTokenResponse {
    token: String,
}

/// HTTP client for the platform API, scoped to the job's workspace
pub struct PlatformClient {
    client: Client,
    base_url: String,
    workspace: String,
    token: String,
}

impl PlatformClient {
    pub fn new(
        base_url: impl Into<String>,
        workspace: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            workspace: workspace.into(),
            token: token.into(),
        })
    }

    /// Client for the workspace and credentials the worker exported
    pub fn from_job_env(env: &JobEnv) -> Result<Self> {
        let workspace = env
            .workspace
            .clone()
            .ok_or_else(|| Error::Config("WM_WORKSPACE is not set".to_string()))?;
        Self::new(env.api_base_url(), workspace, env.token())
    }

    fn workspace_url(&self, tail: &str) -> String {
        format!("{}/api/w/{}/{}", self.base_url, self.workspace, tail)
    }

    async fn get_json(&self, url: String) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::HttpStatus(format!("{}: {}", status, body.trim())))
}

#[async_trait]
impl PlatformApi for PlatformClient {
    async fn resource_value(&self, path: &str) -> Result<Value> {
        let path = strip_resource_prefix(path);
        self.get_json(self.workspace_url(&format!("resources/get_value_interpolated/{}", path)))
            .await
    }

    async fn variable_value(&self, path: &str) -> Result<Value> {
        self.get_json(self.workspace_url(&format!("variables/get_value/{}", path)))
            .await
    }

    async fn github_app_token(&self) -> Result<String> {
        let url = self.workspace_url("github_app/token");
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&GithubTokenRequest {
                job_token: &self.token,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(format!(
                "Error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )));
        }
        let body: GithubTokenResponse = response.json().await?;
        Ok(body.token)
    }
}
