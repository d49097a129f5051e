//! Redacted shell execution.
//!
//! [`ShellRunner`] is what the jobs talk to: it carries the job's logical
//! working directory, environment overlay and the credentials registered for
//! the job. Every command is logged with its secret argument and those
//! credentials masked, and failures become [`Error::Shell`] masked the same way.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::redact::{Redactor, SecretArg};
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};
use crate::config::ToolPaths;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct ShellRunner {
    runner: Arc<dyn ProcessRunner>,
    tools: ToolPaths,
    cwd: PathBuf,
    env: HashMap<String, String>,
    secrets: Vec<String>,
}

impl ShellRunner {
    pub fn new(runner: Arc<dyn ProcessRunner>, tools: ToolPaths, cwd: PathBuf) -> Self {
        Self {
            runner,
            tools,
            cwd,
            env: HashMap::new(),
            secrets: Vec::new(),
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Move the logical working directory; the target must exist.
    pub fn change_dir(&mut self, dir: impl Into<PathBuf>) -> Result<()> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("cannot change directory to '{}'", dir.display()),
            )));
        }
        tracing::debug!("Changed directory to {}", dir.display());
        self.cwd = dir;
        Ok(())
    }

    pub fn set_env(&mut self, key: &str, value: impl Into<String>) {
        self.env.insert(key.to_string(), value.into());
    }

    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Hide `secret` from every later command line, output log and error.
    pub fn add_secret(&mut self, secret: impl Into<String>) {
        let secret = secret.into();
        if !secret.is_empty() && !self.secrets.contains(&secret) {
            self.secrets.push(secret);
        }
    }

    pub fn command(&self, program: &str) -> ShellCommand<'_> {
        ShellCommand {
            shell: self,
            program: program.to_string(),
            args: Vec::new(),
            secret: None,
            stdin: None,
        }
    }

    pub fn git(&self) -> ShellCommand<'_> {
        self.command(&self.tools.git)
    }

    pub fn gpg(&self) -> ShellCommand<'_> {
        self.command(&self.tools.gpg)
    }

    pub fn wmill(&self) -> ShellCommand<'_> {
        self.command(&self.tools.wmill)
    }
}

pub struct ShellCommand<'a> {
    shell: &'a ShellRunner,
    program: String,
    args: Vec<String>,
    secret: Option<SecretArg>,
    stdin: Option<String>,
}

impl<'a> ShellCommand<'a> {
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

    /// Mark the argument at `position` as secret (negative counts from the end).
    pub fn secret(mut self, position: isize) -> Self {
        self.secret = Some(SecretArg::at(position));
        self
    }

    pub fn stdin(mut self, input: String) -> Self {
        self.stdin = Some(input);
        self
    }

    /// Run to completion and return stdout; a non-zero exit is an error.
    pub async fn run(self) -> Result<String> {
        let (output, redactor, line) = self.execute().await?;
        if !output.status.success() {
            let detail = failure_detail(&output);
            tracing::debug!("Command failed: {}", redactor.scrub(&detail));
            return Err(Error::Shell {
                command: line,
                detail: redactor.scrub(&detail),
            });
        }
        tracing::debug!("Command successfully executed");
        Ok(output.stdout)
    }

    /// Run and report the exit status without treating failure as an error.
    pub async fn probe(self) -> Result<ExitStatus> {
        let (output, _, _) = self.execute().await?;
        Ok(output.status)
    }

    async fn execute(self) -> Result<(ProcessOutput, Redactor, String)> {
        let redactor = Redactor::new(&self.args, self.secret).with_secrets(&self.shell.secrets);
        let line = redactor.command_line(&self.program, &self.args);
        tracing::info!("Running '{} ...'", line);

        let mut command = ProcessCommand::new(&self.program)
            .args(&self.args)
            .current_dir(&self.shell.cwd);
        command.env = self.shell.env.clone();
        command.stdin = self.stdin;

        let output = self
            .shell
            .runner
            .run(command)
            .await
            .map_err(|e| Error::Shell {
                command: line.clone(),
                detail: redactor.scrub(&e.to_string()),
            })?;

        if !output.stdout.trim().is_empty() {
            tracing::debug!("stdout: {}", redactor.scrub(output.stdout.trim_end()));
        }
        if !output.stderr.trim().is_empty() {
            tracing::debug!("stderr: {}", redactor.scrub(output.stderr.trim_end()));
        }

        Ok((output, redactor, line))
    }
}

fn failure_detail(output: &ProcessOutput) -> String {
    let stderr = output.stderr.trim();
    let stdout = output.stdout.trim();
    match (stderr.is_empty(), stdout.is_empty()) {
        (false, _) => format!("{}: {}", output.status, stderr),
        (true, false) => format!("{}: {}", output.status, stdout),
        (true, true) => output.status.to_string(),
    }
}
