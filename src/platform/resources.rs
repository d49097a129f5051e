use serde::{Deserialize, Serialize};

use crate::gpg::GpgKey;

/// `git_repository` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepository {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpg_key: Option<GpgKey>,
    #[serde(default)]
    pub is_github_app: bool,
}

impl GitRepository {
    /// Configured branch, if not blank
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref().filter(|b| !b.is_empty())
    }

    /// Configured subfolder, if not blank
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref().filter(|f| !f.is_empty())
    }
}

/// Azure service principal used to mint DevOps access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureServicePrincipal {
    #[serde(rename = "azureTenantId")]
    pub tenant_id: String,
    #[serde(rename = "azureClientId")]
    pub client_id: String,
    #[serde(rename = "azureClientSecret")]
    pub client_secret: String,
}
