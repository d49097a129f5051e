//! HTTP collaborators: the platform API and the Azure identity provider

mod azure;
mod client;
mod resources;

pub use azure::{AzureClient, AZURE_DEVOPS_RESOURCE};
pub use client::PlatformClient;
pub use resources::{AzureServicePrincipal, GitRepository};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Resource reference prefix accepted wherever a resource path is expected
pub const RESOURCE_PREFIX: &str = "$res:";

pub fn strip_resource_prefix(path: &str) -> &str {
    path.strip_prefix(RESOURCE_PREFIX).unwrap_or(path)
}

/// Platform calls a job makes on behalf of its workspace
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Resource value with variables interpolated
    async fn resource_value(&self, path: &str) -> Result<Value>;

    async fn variable_value(&self, path: &str) -> Result<Value>;

    /// Installation token of the workspace's GitHub App
    async fn github_app_token(&self) -> Result<String>;
}

/// Fetch a resource and decode it into `T`
pub async fn fetch_resource<T: DeserializeOwned>(api: &dyn PlatformApi, path: &str) -> Result<T> {
    let value = api.resource_value(path).await?;
    serde_json::from_value(value)
        .map_err(|e| Error::Resource(format!("resource {} is malformed: {}", path, e)))
}
