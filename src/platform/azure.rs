use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::resources::AzureServicePrincipal;
use crate::error::{Error, Result};

/// Azure DevOps application id, requested as the token audience
pub const AZURE_DEVOPS_RESOURCE: &str = "499b84ac-1321-427f-aa17-267ca6975798/.default";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// OAuth2 client-credentials exchange against the Microsoft identity platform
pub struct AzureClient {
    client: Client,
    login_url: String,
}

impl AzureClient {
    pub fn new(login_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            login_url: login_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn access_token(&self, principal: &AzureServicePrincipal) -> Result<String> {
        let url = format!("{}/{}/oauth2/token", self.login_url, principal.tenant_id);
        tracing::info!("Requesting Azure DevOps access token");

        let form = [
            ("client_id", principal.client_id.as_str()),
            ("client_secret", principal.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("resource", AZURE_DEVOPS_RESOURCE),
        ];
        let response = self.client.post(&url).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(format!(
                "Azure token request failed with {}",
                status
            )));
        }

        let body: TokenResponse = response.json().await?;
        body.access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::Resource("Azure token response has no access_token".to_string()))
    }
}
