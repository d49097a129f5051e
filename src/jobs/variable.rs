use serde_json::Value;

use super::JobContext;
use crate::error::Result;

/// `get-variable`: value of a workspace variable
pub async fn get_variable(ctx: &JobContext, path: &str) -> Result<Value> {
    tracing::info!("Fetching variable {}", path);
    ctx.platform.variable_value(path).await
}
