//! Process execution seam.
//!
//! Jobs never spawn processes directly: they hand a [`ProcessCommand`] to a
//! [`ProcessRunner`], which is [`TokioProcessRunner`] in production and
//! [`super::MockProcessRunner`] in tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;

use super::error::ProcessError;

/// Variables inherited from the worker besides `PATH`
const INHERITED_ENV: [&str; 8] = [
    "HOME", "USER", "SHELL", "TMPDIR", "TERM", "LANG", "LC_ALL", "LC_CTYPE",
];

/// One program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Set on top of the inherited variables
    pub env: HashMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub stdin: Option<String>,
}

impl ProcessCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
            working_dir: None,
            timeout: None,
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Timeout,
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    fn from_std(status: std::process::ExitStatus) -> Self {
        if status.success() {
            return ExitStatus::Success;
        }
        if let Some(code) = status.code() {
            return ExitStatus::Error(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitStatus::Signal(signal);
            }
        }
        ExitStatus::Error(1)
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitStatus::Success => write!(f, "exit code 0"),
            ExitStatus::Error(code) => write!(f, "exit code {code}"),
            ExitStatus::Timeout => write!(f, "timeout"),
            ExitStatus::Signal(signal) => write!(f, "signal {signal}"),
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError>;
}

/// Runs commands as child processes with a minimal environment
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    fn prepare(command: &ProcessCommand) -> Result<tokio::process::Command, ProcessError> {
        let path = std::env::var("PATH").map_err(|_| ProcessError::InternalError {
            message: format!("PATH is not set, cannot resolve '{}'", command.program),
        })?;

        let mut child = tokio::process::Command::new(&command.program);
        child
            .args(&command.args)
            .env_clear()
            .env("PATH", path)
            .envs(INHERITED_ENV.iter().filter_map(|key| {
                std::env::var(key).ok().map(|value| (*key, value))
            }))
            .envs(&command.env)
            .stdin(if command.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &command.working_dir {
            child.current_dir(dir);
        }
        Ok(child)
    }

    fn spawn_error(error: std::io::Error, program: &str) -> ProcessError {
        match error.kind() {
            std::io::ErrorKind::NotFound => ProcessError::CommandNotFound(program.to_string()),
            _ => ProcessError::SpawnFailed {
                command: program.to_string(),
                source: error,
            },
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        let started = Instant::now();
        tracing::trace!(
            "Spawning '{}' in {:?} with env overrides {:?}",
            command.program,
            command.working_dir,
            command.env.keys().collect::<Vec<_>>()
        );

        let mut child = Self::prepare(&command)?
            .spawn()
            .map_err(|e| Self::spawn_error(e, &command.program))?;

        if let (Some(input), Some(mut stdin)) = (&command.stdin, child.stdin.take()) {
            stdin.write_all(input.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = match command.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| ProcessError::Timeout(limit))??,
            None => child.wait_with_output().await?,
        };

        let status = ExitStatus::from_std(output.status);
        let duration = started.elapsed();
        tracing::trace!("'{}' finished with {} in {:?}", command.program, status, duration);

        Ok(ProcessOutput {
            status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration,
        })
    }
}
