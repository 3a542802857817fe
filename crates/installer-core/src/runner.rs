//! Shell command execution with streamed output.
//!
//! Commands are grouped into a [`CommandBatch`] and executed as a single
//! `&&` chain, so the chain stops at the first failing command. Output is
//! either attached to the caller's terminal or relayed line by line; a
//! nonzero exit is reported through [`ProcessResult`], never as an `Err`.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// Commands whose output stays untouched when color is disabled, because
/// they do not accept an `--no-ansi` flag.
const ANSI_EXEMPT_COMMANDS: [&str; 3] = ["chmod", "rm", "git"];

/// An ordered group of shell commands executed as one `&&` chain.
#[derive(Debug, Clone, Default)]
pub struct CommandBatch {
    pub commands: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub envs: Vec<(String, String)>,
}

impl CommandBatch {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
            working_dir: None,
            envs: Vec::new(),
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// The single shell line the batch collapses into.
    pub fn shell_line(&self) -> String {
        self.commands.join(" && ")
    }
}

/// Exit status and captured output of a completed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: i32,
    /// Interleaved stdout/stderr lines. Empty when the child was attached
    /// directly to the terminal.
    pub output: String,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs command batches through the platform shell.
pub struct CommandRunner {
    decorated: bool,
    ansi_exempt: Vec<String>,
}

impl CommandRunner {
    /// `decorated` reports whether the surrounding output supports ANSI
    /// color. When it does not, `--no-ansi` is appended to every command
    /// except the exempt ones.
    pub fn new(decorated: bool) -> Self {
        Self {
            decorated,
            ansi_exempt: ANSI_EXEMPT_COMMANDS.map(String::from).to_vec(),
        }
    }

    /// Registers an extra command prefix that must never receive the
    /// `--no-ansi` flag.
    pub fn exempt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ansi_exempt.push(prefix.into());
        self
    }

    /// Runs a batch attached to the terminal when one is available,
    /// falling back to piped output otherwise. The fallback is announced
    /// with a warning but never fails the batch.
    pub async fn run(&self, batch: &CommandBatch) -> Result<ProcessResult> {
        if terminal_attached() {
            return self.run_inherited(batch).await;
        }

        eprintln!(
            "  {} {}\n",
            " WARN ".black().on_yellow(),
            "A pseudo-terminal is not available; command output will be piped."
        );
        self.run_with_sink(batch, |line| println!("  {line}")).await
    }

    /// Runs a batch with piped output, handing every line to `sink` as it
    /// arrives.
    pub async fn run_with_sink(
        &self,
        batch: &CommandBatch,
        mut sink: impl FnMut(&str),
    ) -> Result<ProcessResult> {
        let mut command = self.shell_command(batch);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command
            .spawn()
            .with_context(|| format!("failed to run `{}`", batch.shell_line()))?;

        let stdout = child.stdout.take().context("failed to capture stdout")?;
        let stderr = child.stderr.take().context("failed to capture stderr")?;

        let mut stdout_lines = BufReader::new(stdout).lines();
        let mut stderr_lines = BufReader::new(stderr).lines();

        let mut combined = String::new();
        let mut out_done = false;
        let mut err_done = false;
        while !(out_done && err_done) {
            tokio::select! {
                line = stdout_lines.next_line(), if !out_done => match line {
                    Ok(Some(line)) => {
                        sink(&line);
                        combined.push_str(&line);
                        combined.push('\n');
                    }
                    _ => out_done = true,
                },
                line = stderr_lines.next_line(), if !err_done => match line {
                    Ok(Some(line)) => {
                        sink(&line);
                        combined.push_str(&line);
                        combined.push('\n');
                    }
                    _ => err_done = true,
                },
            }
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("failed to wait for `{}`", batch.shell_line()))?;

        Ok(ProcessResult {
            exit_code: status.code().unwrap_or(-1),
            output: combined,
        })
    }

    async fn run_inherited(&self, batch: &CommandBatch) -> Result<ProcessResult> {
        let mut command = self.shell_command(batch);
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = command
            .status()
            .await
            .with_context(|| format!("failed to run `{}`", batch.shell_line()))?;

        Ok(ProcessResult {
            exit_code: status.code().unwrap_or(-1),
            output: String::new(),
        })
    }

    fn shell_command(&self, batch: &CommandBatch) -> TokioCommand {
        let shell_line = self.decorate_commands(&batch.commands).join(" && ");

        let mut command = if cfg!(windows) {
            let mut command = TokioCommand::new("cmd");
            command.arg("/C").arg(&shell_line);
            command
        } else {
            let mut command = TokioCommand::new("sh");
            command.arg("-c").arg(&shell_line);
            command
        };

        if let Some(dir) = &batch.working_dir {
            command.current_dir(dir);
        }
        for (key, value) in &batch.envs {
            command.env(key, value);
        }

        command
    }

    fn decorate_commands(&self, commands: &[String]) -> Vec<String> {
        if self.decorated {
            return commands.to_vec();
        }

        commands
            .iter()
            .map(|command| {
                let exempt = self
                    .ansi_exempt
                    .iter()
                    .any(|prefix| command.starts_with(prefix.as_str()));
                if exempt {
                    command.clone()
                } else {
                    format!("{command} --no-ansi")
                }
            })
            .collect()
    }
}

fn terminal_attached() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(commands: &[&str]) -> CommandBatch {
        CommandBatch::new(commands.iter().copied())
    }

    #[test]
    fn undecorated_commands_get_no_ansi_appended_once() {
        let runner = CommandRunner::new(false);
        let decorated = runner.decorate_commands(&batch(&[
            "composer create-project demo/demo app",
            "chmod 755 app/artisan",
            "rm -rf app/.git",
            "git init app",
        ]).commands);

        assert_eq!(decorated[0], "composer create-project demo/demo app --no-ansi");
        assert_eq!(decorated[1], "chmod 755 app/artisan");
        assert_eq!(decorated[2], "rm -rf app/.git");
        assert_eq!(decorated[3], "git init app");
    }

    #[test]
    fn decorated_output_leaves_commands_untouched() {
        let runner = CommandRunner::new(true);
        let commands = batch(&["composer install"]).commands;
        assert_eq!(runner.decorate_commands(&commands), commands);
    }

    #[test]
    fn exempt_prefixes_can_be_extended() {
        let runner = CommandRunner::new(false).exempt_prefix("php ./vendor/bin/pest");
        let decorated =
            runner.decorate_commands(&batch(&["php ./vendor/bin/pest --dirty"]).commands);
        assert_eq!(decorated[0], "php ./vendor/bin/pest --dirty");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn chain_stops_at_the_first_failure() {
        let runner = CommandRunner::new(true);
        let mut lines = Vec::new();
        let result = runner
            .run_with_sink(&batch(&["false", "echo reached"]), |line| {
                lines.push(line.to_string())
            })
            .await
            .unwrap();

        assert!(!result.success());
        assert!(!result.output.contains("reached"));
        assert!(lines.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_chain_streams_every_line_in_order() {
        let runner = CommandRunner::new(true);
        let result = runner
            .run_with_sink(&batch(&["echo one", "echo two"]), |_| {})
            .await
            .unwrap();

        assert!(result.success());
        assert_eq!(result.output, "one\ntwo\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn batch_env_overrides_reach_the_child() {
        let runner = CommandRunner::new(true);
        let batch = batch(&["printenv SOLARIS_GREETING"]).env("SOLARIS_GREETING", "hola");
        let result = runner.run_with_sink(&batch, |_| {}).await.unwrap();

        assert!(result.success());
        assert_eq!(result.output.trim(), "hola");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn batch_runs_in_its_working_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = CommandRunner::new(true);
        let batch = batch(&["touch marker"]).in_dir(tmp.path());
        let result = runner.run_with_sink(&batch, |_| {}).await.unwrap();

        assert!(result.success());
        assert!(tmp.path().join("marker").is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stderr_lines_are_part_of_the_combined_output() {
        let runner = CommandRunner::new(true);
        let result = runner
            .run_with_sink(&batch(&["echo oops >&2"]), |_| {})
            .await
            .unwrap();

        assert!(result.success());
        assert_eq!(result.output, "oops\n");
    }
}
