//! Testing utilities and fixtures
//!
//! [`StaticPlatform`] answers platform calls from memory and [`TestContext`]
//! wires it, a [`MockProcessRunner`] and a temporary job directory into a
//! [`JobContext`].

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use crate::config::{GitSyncConfig, JobEnv};
use crate::error::{Error, Result};
use crate::jobs::JobContext;
use crate::platform::{strip_resource_prefix, PlatformApi};
use crate::subprocess::MockProcessRunner;

pub const TEST_TOKEN: &str = "wm_test_token";
pub const TEST_WORKSPACE: &str = "demo";

/// In-memory [`PlatformApi`]
#[derive(Debug, Clone, Default)]
pub struct StaticPlatform {
    resources: HashMap<String, Value>,
    variables: HashMap<String, Value>,
    github_token: Option<String>,
}

impl StaticPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, path: &str, value: Value) -> Self {
        self.resources
            .insert(strip_resource_prefix(path).to_string(), value);
        self
    }

    pub fn with_variable(mut self, path: &str, value: Value) -> Self {
        self.variables.insert(path.to_string(), value);
        self
    }

    pub fn with_github_token(mut self, token: &str) -> Self {
        self.github_token = Some(token.to_string());
        self
    }
}

#[async_trait]
impl PlatformApi for StaticPlatform {
    async fn resource_value(&self, path: &str) -> Result<Value> {
        self.resources
            .get(strip_resource_prefix(path))
            .cloned()
            .ok_or_else(|| Error::HttpStatus(format!("404 Not Found: resource {} not found", path)))
    }

    async fn variable_value(&self, path: &str) -> Result<Value> {
        self.variables
            .get(path)
            .cloned()
            .ok_or_else(|| Error::HttpStatus(format!("404 Not Found: variable {} not found", path)))
    }

    async fn github_app_token(&self) -> Result<String> {
        self.github_token
            .clone()
            .ok_or_else(|| Error::HttpStatus("Error: no GitHub App installed".to_string()))
    }
}

/// `git_repository` resource value for `url`
pub fn git_repository(url: &str) -> Value {
    json!({ "url": url, "is_github_app": false })
}

/// Test context containing the mocks and a temporary job directory
pub struct TestContext {
    pub runner: MockProcessRunner,
    pub platform: StaticPlatform,
    pub env: JobEnv,
    pub config: GitSyncConfig,
    /// Temporary directory the job runs in
    pub temp_dir: TempDir,
}

impl TestContext {
    /// Context with a strict mock runner and the standard job environment
    pub fn new() -> Result<Self> {
        Self::with_runner(MockProcessRunner::new())
    }

    pub fn with_runner(runner: MockProcessRunner) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let config = GitSyncConfig {
            gpg_home: temp_dir.path().join("gpg"),
            ..Default::default()
        };
        let env = JobEnv {
            workspace: Some(TEST_WORKSPACE.to_string()),
            token: Some(TEST_TOKEN.to_string()),
            base_url: Some("http://localhost:8000".to_string()),
            base_internal_url: None,
            email: Some("alex@example.com".to_string()),
            username: Some("alex".to_string()),
        };

        Ok(Self {
            runner,
            platform: StaticPlatform::new(),
            env,
            config,
            temp_dir,
        })
    }

    pub fn work_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a directory below the job directory, as a clone would
    pub fn create_dir(&self, relative: &str) -> Result<PathBuf> {
        let path = self.work_dir().join(relative);
        std::fs::create_dir_all(&path)?;
        Ok(path)
    }

    pub fn create_test_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.work_dir().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn job_context(&self) -> JobContext {
        JobContext::new(
            self.config.clone(),
            self.env.clone(),
            Arc::new(self.platform.clone()),
            Arc::new(self.runner.clone()),
            self.work_dir().to_path_buf(),
        )
    }
}
