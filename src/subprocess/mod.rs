pub mod error;
pub mod mock;
pub mod redact;
pub mod runner;
pub mod shell;

#[cfg(test)]
mod tests;

pub use error::ProcessError;
pub use mock::{MockCommandConfig, MockProcessRunner};
pub use redact::{Redactor, SecretArg, REDACTED};
pub use runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use shell::{ShellCommand, ShellRunner};

use std::sync::Arc;

/// Process runner used outside of tests
pub fn production_runner() -> Arc<dyn ProcessRunner> {
    Arc::new(TokioProcessRunner)
}
