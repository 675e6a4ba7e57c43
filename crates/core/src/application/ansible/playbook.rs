// Ansible playbook use case

use super::command::{self, StagedPaths};
use super::staging::WorkDir;
use super::{invoke, AnsibleOutput, PreparedInvocation};
use crate::constants::{INVENTORY_FILE_NAME, PLAYBOOK_FILE_NAME};
use crate::domain::{ActionContext, ActionResult, PlaybookOptions};
use crate::error::Result;
use crate::port::{CommandSpec, ProcessRunner};
use std::collections::BTreeMap;
use tracing::warn;

/// Execute `ansible-playbook` for the given options
pub async fn execute(
    runner: &dyn ProcessRunner,
    program: &str,
    options: &PlaybookOptions,
    ctx: &ActionContext,
) -> Result<ActionResult<AnsibleOutput>> {
    let extra_env = match options.common.extra_env() {
        Ok(env) => env,
        Err(e) => {
            warn!(error = %e, "Rejected ansible-playbook request");
            return Ok(ActionResult::error(e.to_string()));
        }
    };

    let invocation = prepare(program, options, extra_env, ctx)?;
    let output = invoke(runner, invocation).await?;

    Ok(ActionResult::Data(output))
}

/// Create the working directory, stage inputs and build the command
pub fn prepare(
    program: &str,
    options: &PlaybookOptions,
    extra_env: BTreeMap<String, String>,
    ctx: &ActionContext,
) -> Result<PreparedInvocation> {
    let common = &options.common;
    let work_dir = WorkDir::create(common.keeps_work_dir())?;

    let staged = StagedPaths {
        playbook: work_dir.resolve_yaml(&options.playbook, PLAYBOOK_FILE_NAME)?,
        inventory: work_dir.resolve_yaml(&common.inventory, INVENTORY_FILE_NAME)?,
        private_key: work_dir.resolve_private_key(&common.ssh_private_key)?,
    };

    let credentials = common.wants_openstack_credentials().then_some(ctx);
    let spec = CommandSpec {
        program: program.to_string(),
        args: command::playbook_args(options, &staged),
        cwd: work_dir.path().to_path_buf(),
        env: command::environment(work_dir.path(), extra_env, credentials),
    };

    Ok(PreparedInvocation {
        work_dir,
        staged,
        spec,
    })
}
