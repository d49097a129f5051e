#[cfg(test)]
mod tests {
    use super::super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_production_runner_success() {
        let output = TokioProcessRunner
            .run(ProcessCommand::new("echo").arg("hello world"))
            .await
            .unwrap();

        assert!(output.status.success());
        assert_eq!(output.stdout.trim(), "hello world");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_production_runner_failure() {
        let output = TokioProcessRunner
            .run(ProcessCommand::new("false"))
            .await
            .unwrap();
        assert_eq!(output.status, ExitStatus::Error(1));
    }

    #[tokio::test]
    async fn test_production_runner_command_not_found() {
        let result = TokioProcessRunner
            .run(ProcessCommand::new("nonexistent-command-12345"))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            ProcessError::CommandNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_production_runner_timeout() {
        let command = ProcessCommand::new("sleep")
            .arg("5")
            .timeout(Duration::from_millis(100));

        let result = TokioProcessRunner.run(command).await;
        assert!(matches!(result.unwrap_err(), ProcessError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_production_runner_stdin_and_env() {
        let command = ProcessCommand::new("sh")
            .args(["-c", "cat; printf ' %s' \"$GIT_TERMINAL_PROMPT\""])
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin("key material");

        let output = TokioProcessRunner.run(command).await.unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, "key material 0");
    }

    #[tokio::test]
    async fn test_production_runner_does_not_leak_worker_env() {
        std::env::set_var("GITSYNC_TEST_LEAK", "visible");
        let command = ProcessCommand::new("sh").args(["-c", "printf '%s' \"$GITSYNC_TEST_LEAK\""]);

        let output = TokioProcessRunner.run(command).await.unwrap();
        assert_eq!(output.stdout, "");
    }

    #[tokio::test]
    async fn test_production_runner_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output = TokioProcessRunner
            .run(ProcessCommand::new("pwd").current_dir(dir.path()))
            .await
            .unwrap();

        let reported = std::path::PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_mock_runner_basic() {
        let mut mock = MockProcessRunner::new();
        mock.expect_command("git")
            .with_args(|args| args == ["status"])
            .returns_stdout("On branch main\n")
            .finish();

        let output = mock
            .run(ProcessCommand::new("git").arg("status"))
            .await
            .unwrap();

        assert!(output.status.success());
        assert_eq!(output.stdout, "On branch main\n");
        assert_eq!(mock.calls_to("git").len(), 1);
    }

    #[tokio::test]
    async fn test_mock_runner_exhausted_expectation_falls_through() {
        let mut mock = MockProcessRunner::new();
        mock.expect_command("git")
            .with_args_prefix(&["push"])
            .returns_exit_code(1)
            .returns_stderr("rejected")
            .times(1)
            .finish();
        mock.expect_command("git")
            .with_args_prefix(&["push"])
            .finish();

        let push = || ProcessCommand::new("git").arg("push");
        let first = mock.run(push()).await.unwrap();
        let second = mock.run(push()).await.unwrap();

        assert_eq!(first.status, ExitStatus::Error(1));
        assert!(second.status.success());
        assert_eq!(mock.calls_to("git").len(), 2);
    }

    #[tokio::test]
    async fn test_mock_runner_unexpected_command() {
        let mock = MockProcessRunner::new();
        let result = mock.run(ProcessCommand::new("gpg").arg("--version")).await;
        assert!(matches!(
            result.unwrap_err(),
            ProcessError::MockExpectationNotMet(_)
        ));

        let permissive = MockProcessRunner::permissive();
        let output = permissive
            .run(ProcessCommand::new("gpg").arg("--version"))
            .await
            .unwrap();
        assert!(output.status.success());
        assert!(permissive.was_called_with("gpg", &["--version"]));
    }

    #[tokio::test]
    async fn test_mock_runner_clones_share_history() {
        let mock = MockProcessRunner::permissive();
        let clone = mock.clone();
        clone.run(ProcessCommand::new("git").arg("fetch")).await.unwrap();

        assert!(mock.was_called_with("git", &["fetch"]));
    }
}
