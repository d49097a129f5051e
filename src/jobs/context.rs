use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{GitSyncConfig, JobEnv};
use crate::error::Result;
use crate::platform::{AzureClient, PlatformApi, PlatformClient};
use crate::subprocess::{production_runner, ProcessRunner, ShellRunner};
use crate::wmill::WmillCli;

/// Everything a job needs from its surroundings
#[derive(Clone)]
pub struct JobContext {
    pub config: GitSyncConfig,
    pub env: JobEnv,
    pub platform: Arc<dyn PlatformApi>,
    pub runner: Arc<dyn ProcessRunner>,
    /// Directory the job starts in; the clone is created below it
    pub work_dir: PathBuf,
}

impl JobContext {
    pub fn new(
        config: GitSyncConfig,
        env: JobEnv,
        platform: Arc<dyn PlatformApi>,
        runner: Arc<dyn ProcessRunner>,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            config,
            env,
            platform,
            runner,
            work_dir,
        }
    }

    /// Context wired to the real platform API and real subprocesses
    pub fn production(config: GitSyncConfig, env: JobEnv) -> Result<Self> {
        let platform = Arc::new(PlatformClient::from_job_env(&env)?);
        let work_dir = std::env::current_dir()?;
        Ok(Self::new(config, env, platform, production_runner(), work_dir))
    }

    /// Fresh shell rooted at the job directory.
    ///
    /// Subprocesses get the configured HOME and never prompt for credentials;
    /// the platform token is hidden from everything the shell logs.
    pub fn shell(&self) -> ShellRunner {
        let mut shell = ShellRunner::new(
            Arc::clone(&self.runner),
            self.config.tools.clone(),
            self.work_dir.clone(),
        );
        shell.set_env("HOME", self.config.resolved_home(&self.work_dir).display().to_string());
        shell.set_env("GIT_TERMINAL_PROMPT", "0");
        shell.add_secret(self.env.token());
        shell
    }

    pub fn wmill(&self) -> WmillCli {
        WmillCli::new(self.env.token(), self.env.cli_base_url())
    }

    pub fn azure(&self) -> Result<AzureClient> {
        AzureClient::new(&self.config.azure_login_url)
    }
}
