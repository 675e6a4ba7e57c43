// Ansible Service - module and playbook invokers

pub mod command;
pub mod module;
pub mod playbook;
pub mod staging;

pub use command::StagedPaths;
pub use staging::WorkDir;

use crate::constants::{ANSIBLE_BIN, ANSIBLE_PLAYBOOK_BIN};
use crate::domain::{ActionContext, ActionResult, ModuleOptions, PlaybookOptions};
use crate::error::Result;
use crate::port::{CommandSpec, ProcessRunner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Executables invoked by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsibleBinaries {
    pub ansible: String,
    pub ansible_playbook: String,
}

impl Default for AnsibleBinaries {
    fn default() -> Self {
        Self {
            ansible: ANSIBLE_BIN.to_string(),
            ansible_playbook: ANSIBLE_PLAYBOOK_BIN.to_string(),
        }
    }
}

/// Captured streams of an ansible run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsibleOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Everything one run needs, computed once before execution
///
/// Owns the working directory: dropping the invocation removes it (unless
/// kept), whichever way the run ends.
#[derive(Debug)]
pub struct PreparedInvocation {
    pub work_dir: WorkDir,
    pub staged: StagedPaths,
    pub spec: CommandSpec,
}

/// Ansible Service
pub struct AnsibleService {
    runner: Arc<dyn ProcessRunner>,
    binaries: AnsibleBinaries,
}

impl AnsibleService {
    pub fn new(runner: Arc<dyn ProcessRunner>, binaries: AnsibleBinaries) -> Self {
        Self { runner, binaries }
    }

    /// Run an ansible module against a host pattern
    pub async fn run_module(
        &self,
        options: &ModuleOptions,
        ctx: &ActionContext,
    ) -> Result<ActionResult<AnsibleOutput>> {
        module::execute(self.runner.as_ref(), &self.binaries.ansible, options, ctx).await
    }

    /// Run a playbook
    pub async fn run_playbook(
        &self,
        options: &PlaybookOptions,
        ctx: &ActionContext,
    ) -> Result<ActionResult<AnsibleOutput>> {
        playbook::execute(
            self.runner.as_ref(),
            &self.binaries.ansible_playbook,
            options,
            ctx,
        )
        .await
    }
}

/// Run a prepared invocation and release its working directory
async fn invoke(runner: &dyn ProcessRunner, invocation: PreparedInvocation) -> Result<AnsibleOutput> {
    info!(
        program = %invocation.spec.program,
        args = ?invocation.spec.args,
        work_dir = %invocation.work_dir.path().display(),
        "Running ansible"
    );

    let output = runner.run(&invocation.spec).await?;

    if !output.success() {
        error!(
            command = ?invocation.spec.argv(),
            exit_code = ?output.exit_code,
            stdout = %output.stdout,
            stderr = %output.stderr,
            "Ansible exited unsuccessfully"
        );
    }

    if invocation.work_dir.is_kept() {
        info!(
            work_dir = %invocation.work_dir.path().display(),
            "Working directory retained (verbosity 0)"
        );
    }

    Ok(AnsibleOutput {
        stdout: output.stdout,
        stderr: output.stderr,
    })
}
