// Process Runner Port
// Abstraction for running the external ansible binaries

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Fully resolved command line of one external process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: BTreeMap<String, String>,
}

impl CommandSpec {
    /// Program followed by its arguments, as it would appear in a shell
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

/// Captured output of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Process Runner trait
///
/// Implementations:
/// - SubprocessRunner: spawns the program with tokio
/// - MockProcessRunner: records calls (tests)
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a command to completion and capture both streams
    ///
    /// A non-zero exit is not an error: both streams are still returned.
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the process cannot be started
    /// - ExecutionError::IoError if waiting on the process fails
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit with the given code and streams
        Exit {
            code: i32,
            stdout: String,
            stderr: String,
        },
        /// Fail to spawn with message
        SpawnFail(String),
    }

    /// One recorded call, with the working directory as it was during the run
    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub spec: CommandSpec,
        pub work_dir_existed: bool,
        pub staged_files: BTreeMap<String, String>,
    }

    /// Mock Process Runner for testing
    pub struct MockProcessRunner {
        behavior: Arc<Mutex<MockBehavior>>,
        calls: Arc<Mutex<Vec<RecordedCall>>>,
    }

    impl MockProcessRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success(stdout: impl Into<String>) -> Self {
            Self::new(MockBehavior::Exit {
                code: 0,
                stdout: stdout.into(),
                stderr: String::new(),
            })
        }

        pub fn new_exit(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
            Self::new(MockBehavior::Exit {
                code,
                stdout: stdout.into(),
                stderr: stderr.into(),
            })
        }

        pub fn new_spawn_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::SpawnFail(message.into()))
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn last_call(&self) -> Option<RecordedCall> {
            self.calls.lock().unwrap().last().cloned()
        }

        fn snapshot(dir: &Path) -> BTreeMap<String, String> {
            let Ok(entries) = std::fs::read_dir(dir) else {
                return BTreeMap::new();
            };

            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .map(|entry| {
                    let name = entry.file_name().to_string_lossy().to_string();
                    let contents = std::fs::read_to_string(entry.path()).unwrap_or_default();
                    (name, contents)
                })
                .collect()
        }
    }

    #[async_trait]
    impl ProcessRunner for MockProcessRunner {
        async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecutionError> {
            self.calls.lock().unwrap().push(RecordedCall {
                spec: spec.clone(),
                work_dir_existed: spec.cwd.is_dir(),
                staged_files: Self::snapshot(&spec.cwd),
            });

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Exit {
                    code,
                    stdout,
                    stderr,
                } => Ok(CommandOutput {
                    exit_code: Some(code),
                    stdout,
                    stderr,
                }),
                MockBehavior::SpawnFail(msg) => Err(ExecutionError::SpawnFailed(msg)),
            }
        }
    }
}
