// Subprocess runner implementation
// reason: tokio for async process management
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{info, warn};

use tripleo_actions_core::port::process_runner::{
    CommandOutput, CommandSpec, ExecutionError, ProcessRunner,
};

/// Subprocess runner
/// Children inherit the parent environment, augmented with the command's own
/// variables. An allowlist switches to a cleared environment instead.
#[derive(Default)]
pub struct SubprocessRunner {
    env_allowlist: Option<Vec<String>>,
}

impl SubprocessRunner {
    /// Create a runner whose children inherit the full parent environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner whose children only see allowlisted parent variables
    ///
    /// # Arguments
    /// * `env_allowlist` - Parent environment variables the child may inherit
    ///
    /// # Example
    /// ```ignore
    /// let runner = SubprocessRunner::with_env_allowlist(vec!["PATH".to_string(), "LANG".to_string()]);
    /// ```
    pub fn with_env_allowlist(env_allowlist: Vec<String>) -> Self {
        Self {
            env_allowlist: Some(env_allowlist),
        }
    }

    /// Allowlisted parent variables; `None` when the child inherits everything
    fn filter_env(&self) -> Option<BTreeMap<String, String>> {
        self.env_allowlist.as_ref().map(|allowlist| {
            std::env::vars()
                .filter(|(k, _)| allowlist.contains(k))
                .collect()
        })
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(&self, spec: &CommandSpec) -> Result<std::process::Output, ExecutionError> {
        let mut command = Command::new(&spec.program);
        if let Some(inherited) = self.filter_env() {
            command.env_clear().envs(inherited);
        }

        let child = command
            .args(&spec.args)
            .envs(&spec.env)
            .current_dir(&spec.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecutionError::SpawnFailed(format!("{}: {}", spec.program, e)))?;

        child
            .wait_with_output()
            .await
            .map_err(|e| ExecutionError::IoError(e.to_string()))
    }

    /// Build command output from process output
    fn build_output(output: std::process::Output) -> CommandOutput {
        CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

#[async_trait]
impl ProcessRunner for SubprocessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecutionError> {
        let start = Instant::now();

        info!(
            program = %spec.program,
            args = ?spec.args,
            cwd = %spec.cwd.display(),
            "Starting subprocess"
        );

        let output = Self::build_output(self.spawn_and_wait(spec).await?);
        let duration_ms = start.elapsed().as_millis();

        if output.success() {
            info!(
                program = %spec.program,
                duration_ms = %duration_ms,
                "Subprocess completed"
            );
        } else {
            warn!(
                program = %spec.program,
                duration_ms = %duration_ms,
                exit_code = ?output.exit_code,
                "Subprocess exited unsuccessfully"
            );
        }

        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn spec(program: &str, args: &[&str], env: &[(&str, &str)]) -> CommandSpec {
        CommandSpec {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: std::env::temp_dir(),
            env: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_run_success() {
        let runner = SubprocessRunner::new();

        let output = runner.run(&spec("echo", &["hello"], &[])).await.unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_nonzero_exit_returns_streams() {
        let runner = SubprocessRunner::new();

        let output = runner
            .run(&spec("sh", &["-c", "echo out; echo err >&2; exit 3"], &[]))
            .await
            .unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let runner = SubprocessRunner::new();

        let result = runner
            .run(&spec("/nonexistent/ansible-binary", &[], &[]))
            .await;

        assert!(matches!(result, Err(ExecutionError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn test_cwd_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SubprocessRunner::new();

        let mut spec = spec(
            "sh",
            &["-c", "pwd; echo $HOME; echo ${TRIPLEO_RUNNER_ANSIBLE_CONFIG:-unset}"],
            &[],
        );
        spec.cwd = dir.path().to_path_buf();
        spec.env.insert("HOME".to_string(), "/tmp/work-home".to_string());

        std::env::set_var("TRIPLEO_RUNNER_ANSIBLE_CONFIG", "/etc/ansible/tripleo.cfg");
        let output = runner.run(&spec).await.unwrap();
        std::env::remove_var("TRIPLEO_RUNNER_ANSIBLE_CONFIG");

        let lines: Vec<&str> = output.stdout.lines().collect();
        let cwd = PathBuf::from(lines[0]).canonicalize().unwrap();
        assert_eq!(cwd, dir.path().canonicalize().unwrap());
        assert_eq!(lines[1], "/tmp/work-home");
        assert_eq!(lines[2], "/etc/ansible/tripleo.cfg");
    }

    #[tokio::test]
    async fn test_command_env_overrides_parent() {
        let runner = SubprocessRunner::new();

        std::env::set_var("TRIPLEO_RUNNER_OVERRIDE", "parent");
        let output = runner
            .run(&spec(
                "sh",
                &["-c", "echo $TRIPLEO_RUNNER_OVERRIDE"],
                &[("TRIPLEO_RUNNER_OVERRIDE", "command")],
            ))
            .await
            .unwrap();
        std::env::remove_var("TRIPLEO_RUNNER_OVERRIDE");

        assert_eq!(output.stdout.trim(), "command");
    }

    #[tokio::test]
    async fn test_allowlist_clears_environment() {
        let runner = SubprocessRunner::with_env_allowlist(vec![
            "PATH".to_string(),
            "TRIPLEO_RUNNER_ALLOWED".to_string(),
        ]);

        std::env::set_var("TRIPLEO_RUNNER_ALLOWED", "value1");
        std::env::set_var("TRIPLEO_RUNNER_BLOCKED", "value2");
        let output = runner
            .run(&spec(
                "sh",
                &["-c", "echo ${TRIPLEO_RUNNER_ALLOWED:-unset}; echo ${TRIPLEO_RUNNER_BLOCKED:-unset}; echo $EXTRA"],
                &[("EXTRA", "value3")],
            ))
            .await
            .unwrap();
        std::env::remove_var("TRIPLEO_RUNNER_BLOCKED");

        let lines: Vec<&str> = output.stdout.lines().collect();
        assert_eq!(lines, vec!["value1", "unset", "value3"]);
    }
}
