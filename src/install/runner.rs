//! External command execution for tool installs

use crate::core::CommandOutcome;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Trait for running one install command - allows scripted runners in tests
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion, capturing exit status and stderr.
    ///
    /// Never returns an error: a command that cannot be spawned is reported
    /// as an outcome with no exit code and the failure text in stderr.
    async fn run(&self, command: &str, shell: bool) -> CommandOutcome;
}

/// Runs commands as real subprocesses
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &str, shell: bool) -> CommandOutcome {
        debug!(%command, shell, "running install command");

        let mut cmd = if shell {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        } else {
            let words = split_command(command);
            let Some((program, args)) = words.split_first() else {
                return CommandOutcome {
                    exit_code: None,
                    stderr: "empty command".to_string(),
                };
            };
            let mut c = Command::new(program);
            c.args(args);
            c
        };

        let output = match cmd.kill_on_drop(true).output().await {
            Ok(output) => output,
            Err(e) => {
                return CommandOutcome {
                    exit_code: None,
                    stderr: format!("failed to spawn: {}", e),
                }
            }
        };

        CommandOutcome {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Split a command line into words, honoring single and double quotes
pub fn split_command(command: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in command.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        words.push(std::mem::take(&mut current));
                    }
                }
                c => current.push(c),
            },
        }
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_command() {
        assert_eq!(
            split_command("make -s -j -C /tmp/masscan"),
            vec!["make", "-s", "-j", "-C", "/tmp/masscan"]
        );
    }

    #[test]
    fn test_split_respects_quotes() {
        assert_eq!(
            split_command(r#"git commit -m "initial import""#),
            vec!["git", "commit", "-m", "initial import"]
        );
        assert_eq!(split_command("echo 'a b' c"), vec!["echo", "a b", "c"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_command("   ").is_empty());
    }

    #[tokio::test]
    async fn test_runner_captures_exit_code() {
        let runner = ProcessRunner;
        let outcome = runner.run("true", false).await;
        assert_eq!(outcome.exit_code, Some(0));

        let outcome = runner.run("false", false).await;
        assert_eq!(outcome.exit_code, Some(1));
    }

    #[tokio::test]
    async fn test_runner_shell_subshells() {
        let runner = ProcessRunner;
        let outcome = runner.run("true && true", true).await;
        assert!(outcome.success());
    }

    #[tokio::test]
    async fn test_runner_captures_stderr() {
        let runner = ProcessRunner;
        let outcome = runner.run("sh -c 'echo oops >&2; exit 3'", false).await;
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.stderr, "oops");
    }

    #[tokio::test]
    async fn test_runner_missing_binary() {
        let runner = ProcessRunner;
        let outcome = runner.run("definitely-not-a-real-binary-x1 --flag", false).await;
        assert_eq!(outcome.exit_code, None);
        assert!(outcome.stderr.contains("failed to spawn"));
    }
}
