use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

type ArgsMatcher = Box<dyn Fn(&[String]) -> bool + Send + Sync>;

/// Scripted [`ProcessRunner`] that records every command it receives.
///
/// Expectations are matched in registration order. An expectation limited
/// with [`MockCommandConfig::times`] stops matching once used up, which lets a
/// test script "fail first, then succeed" sequences for the same command.
/// Clones share expectations and history.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    state: Arc<Mutex<MockState>>,
    allow_unmatched: bool,
}

#[derive(Default)]
struct MockState {
    expectations: Vec<Expectation>,
    history: Vec<ProcessCommand>,
}

struct Expectation {
    program: String,
    matcher: Option<ArgsMatcher>,
    reply: ProcessOutput,
    remaining: Option<usize>,
}

impl Expectation {
    fn accepts(&self, command: &ProcessCommand) -> bool {
        self.program == command.program
            && self.remaining != Some(0)
            && self.matcher.as_ref().map_or(true, |m| m(&command.args))
    }
}

fn empty_success() -> ProcessOutput {
    ProcessOutput {
        status: ExitStatus::Success,
        stdout: String::new(),
        stderr: String::new(),
        duration: Duration::from_millis(10),
    }
}

impl MockProcessRunner {
    /// A mock that rejects any command without a matching expectation
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that answers every unexpected command with an empty success
    pub fn permissive() -> Self {
        Self {
            allow_unmatched: true,
            ..Self::default()
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start scripting a reply for `program`; the reply is a plain success
    /// until configured otherwise.
    pub fn expect_command(&mut self, program: &str) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            expectation: Expectation {
                program: program.to_string(),
                matcher: None,
                reply: empty_success(),
                remaining: None,
            },
        }
    }

    pub fn get_call_history(&self) -> Vec<ProcessCommand> {
        self.state().history.clone()
    }

    /// Argument lists of every recorded call to `program`, in order
    pub fn calls_to(&self, program: &str) -> Vec<Vec<String>> {
        self.state()
            .history
            .iter()
            .filter(|cmd| cmd.program == program)
            .map(|cmd| cmd.args.clone())
            .collect()
    }

    /// Whether `program` was ever called with exactly `args`
    pub fn was_called_with(&self, program: &str, args: &[&str]) -> bool {
        self.calls_to(program)
            .iter()
            .any(|call| call.iter().map(String::as_str).eq(args.iter().copied()))
    }

    /// Forget all expectations and recorded calls
    pub fn reset(&mut self) {
        let mut state = self.state();
        state.expectations.clear();
        state.history.clear();
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        let mut state = self.state();
        state.history.push(command.clone());

        if let Some(expectation) = state.expectations.iter_mut().find(|e| e.accepts(&command)) {
            if let Some(remaining) = expectation.remaining.as_mut() {
                *remaining -= 1;
            }
            return Ok(expectation.reply.clone());
        }

        if self.allow_unmatched {
            return Ok(empty_success());
        }
        Err(ProcessError::MockExpectationNotMet(format!(
            "no expectation for {} {:?}",
            command.program, command.args
        )))
    }
}

/// Reply being scripted; registered by [`MockCommandConfig::finish`]
pub struct MockCommandConfig {
    runner: MockProcessRunner,
    expectation: Expectation,
}

impl MockCommandConfig {
    pub fn with_args<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.expectation.matcher = Some(Box::new(matcher));
        self
    }

    /// Match calls whose argument list starts with `prefix`
    pub fn with_args_prefix(self, prefix: &[&str]) -> Self {
        let prefix: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
        self.with_args(move |args| args.starts_with(&prefix))
    }

    pub fn returns_stdout(mut self, stdout: &str) -> Self {
        self.expectation.reply.stdout = stdout.to_string();
        self
    }

    pub fn returns_stderr(mut self, stderr: &str) -> Self {
        self.expectation.reply.stderr = stderr.to_string();
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        self.expectation.reply.status = match code {
            0 => ExitStatus::Success,
            code => ExitStatus::Error(code),
        };
        self
    }

    /// Answer at most `n` matching calls
    pub fn times(mut self, n: usize) -> Self {
        self.expectation.remaining = Some(n);
        self
    }

    pub fn finish(self) {
        self.runner.state().expectations.push(self.expectation);
    }
}
