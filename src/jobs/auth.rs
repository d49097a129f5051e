use super::JobContext;
use crate::error::Result;
use crate::git::{prepend_token_to_github_url, AzurePlaceholder};
use crate::platform::{fetch_resource, AzureServicePrincipal, GitRepository};
use crate::subprocess::ShellRunner;

/// Repository URL with credentials filled in.
///
/// GitHub App repositories get an installation token; an
/// `AZURE_DEVOPS_TOKEN(<resource>)` marker is replaced by a fresh access token
/// of that service principal. Every token obtained is registered with `shell`,
/// which keeps it out of logs and errors for the rest of the job, since git
/// echoes the remote URL when a push or pull fails.
pub async fn authenticated_url(
    ctx: &JobContext,
    repo: &GitRepository,
    shell: &mut ShellRunner,
) -> Result<String> {
    let mut url = repo.url.clone();

    if repo.is_github_app {
        tracing::info!("Using GitHub App authentication");
        let token = ctx.platform.github_app_token().await?;
        shell.add_secret(token.as_str());
        url = prepend_token_to_github_url(&url, &token)?;
    }

    if let Some(placeholder) = AzurePlaceholder::find(&url) {
        tracing::info!("Requires Azure DevOps service account access token, requesting...");
        let principal: AzureServicePrincipal =
            fetch_resource(ctx.platform.as_ref(), &placeholder.resource_path).await?;
        let token = ctx.azure()?.access_token(&principal).await?;
        shell.add_secret(token.as_str());
        url = placeholder.substitute(&url, &token);
    }

    Ok(url)
}
