// Ansible module use case

use super::command::{self, StagedPaths};
use super::staging::WorkDir;
use super::{invoke, AnsibleOutput, PreparedInvocation};
use crate::constants::INVENTORY_FILE_NAME;
use crate::domain::{ActionContext, ActionResult, ModuleOptions};
use crate::error::Result;
use crate::port::{CommandSpec, ProcessRunner};
use std::collections::BTreeMap;
use tracing::warn;

/// Execute `ansible` for the given options
///
/// # Arguments
///
/// * `runner` - Process runner port
/// * `program` - `ansible` executable
/// * `options` - Parsed option record
/// * `ctx` - Caller authentication context
pub async fn execute(
    runner: &dyn ProcessRunner,
    program: &str,
    options: &ModuleOptions,
    ctx: &ActionContext,
) -> Result<ActionResult<AnsibleOutput>> {
    let extra_env = match options.common.extra_env() {
        Ok(env) => env,
        Err(e) => {
            warn!(error = %e, "Rejected ansible request");
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
    options: &ModuleOptions,
    extra_env: BTreeMap<String, String>,
    ctx: &ActionContext,
) -> Result<PreparedInvocation> {
    let common = &options.common;
    let work_dir = WorkDir::create(common.keeps_work_dir())?;

    let staged = StagedPaths {
        inventory: work_dir.resolve_yaml(&common.inventory, INVENTORY_FILE_NAME)?,
        private_key: work_dir.resolve_private_key(&common.ssh_private_key)?,
        playbook: None,
    };

    let credentials = common.wants_openstack_credentials().then_some(ctx);
    let spec = CommandSpec {
        program: program.to_string(),
        args: command::module_args(options, &staged),
        cwd: work_dir.path().to_path_buf(),
        env: command::environment(work_dir.path(), extra_env, credentials),
    };

    Ok(PreparedInvocation {
        work_dir,
        staged,
        spec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Kwargs;
    use crate::port::process_runner::mocks::MockProcessRunner;
    use serde_json::{json, Value};

    fn options(value: Value) -> ModuleOptions {
        match value {
            Value::Object(map) => ModuleOptions::from_kwargs(map).unwrap(),
            _ => panic!("kwargs must be an object"),
        }
    }

    fn context() -> ActionContext {
        ActionContext {
            auth_uri: Some("http://192.0.2.1:5000/v3".to_string()),
            user_name: Some("admin".to_string()),
            auth_token: Some("gAAAAABZ".to_string()),
            project_name: Some("admin".to_string()),
        }
    }

    #[tokio::test]
    async fn test_run_returns_streams() {
        let runner = MockProcessRunner::new_exit(0, "pong", "warning");
        let options = options(json!({"hosts": "all", "module": "ping"}));

        let result = execute(&runner, "ansible", &options, &context())
            .await
            .unwrap();

        assert_eq!(
            result,
            ActionResult::Data(AnsibleOutput {
                stdout: "pong".to_string(),
                stderr: "warning".to_string(),
            })
        );

        let call = runner.last_call().unwrap();
        assert_eq!(call.spec.program, "ansible");
        assert_eq!(
            call.spec.args,
            vec!["all", "-vvvvv", "--module-name", "ping"]
        );
        assert_eq!(
            call.spec.env.get("HOME").map(String::as_str),
            Some(call.spec.cwd.to_str().unwrap())
        );
        assert!(call.work_dir_existed);
    }

    #[tokio::test]
    async fn test_nonzero_exit_still_returns_streams() {
        let runner = MockProcessRunner::new_exit(2, "", "UNREACHABLE");
        let options = options(json!({"hosts": "all", "module": "ping"}));

        let result = execute(&runner, "ansible", &options, &context())
            .await
            .unwrap();

        assert_eq!(result.data().unwrap().stderr, "UNREACHABLE");
    }

    #[tokio::test]
    async fn test_extra_env_not_a_dict_short_circuits() {
        let runner = MockProcessRunner::new_success("");
        let options = options(json!({
            "hosts": "all",
            "extra_env_variables": "FOO=bar",
        }));

        let result = execute(&runner, "ansible", &options, &context())
            .await
            .unwrap();

        assert_eq!(
            result,
            ActionResult::error("extra_env_variables must be a dict")
        );
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_credentials_only_when_requested() {
        let runner = MockProcessRunner::new_success("");

        let plain = options(json!({"hosts": "all"}));
        execute(&runner, "ansible", &plain, &context()).await.unwrap();
        let env = runner.last_call().unwrap().spec.env;
        assert!(!env.contains_key("OS_AUTH_TOKEN"));

        let with_creds = options(json!({
            "hosts": "all",
            "use_openstack_credentials": true,
            "extra_env_variables": {"ANSIBLE_CONFIG": "/etc/ansible/ansible.cfg"},
        }));
        execute(&runner, "ansible", &with_creds, &context())
            .await
            .unwrap();
        let env = runner.last_call().unwrap().spec.env;
        assert_eq!(env["OS_AUTH_URL"], "http://192.0.2.1:5000/v3");
        assert_eq!(env["OS_USERNAME"], "admin");
        assert_eq!(env["OS_AUTH_TOKEN"], "gAAAAABZ");
        assert_eq!(env["OS_PROJECT_NAME"], "admin");
        assert_eq!(env["ANSIBLE_CONFIG"], "/etc/ansible/ansible.cfg");
    }

    #[tokio::test]
    async fn test_inline_inputs_staged_then_removed() {
        let runner = MockProcessRunner::new_success("");
        let options = options(json!({
            "hosts": "overcloud",
            "inventory": {"overcloud": {"hosts": {"node-0": {}}}},
            "ssh_private_key": "KEY MATERIAL",
        }));

        execute(&runner, "ansible", &options, &context())
            .await
            .unwrap();

        let call = runner.last_call().unwrap();
        assert!(call.staged_files.contains_key("inventory.yaml"));
        assert_eq!(call.staged_files["ssh_private_key"], "KEY MATERIAL");

        let inventory_path = call.spec.cwd.join("inventory.yaml");
        let args = call.spec.args.clone();
        let pos = args.iter().position(|a| a == "--inventory-file").unwrap();
        assert_eq!(args[pos + 1], inventory_path.to_string_lossy());

        // verbosity 5 (default): directory removed after the run
        assert!(!call.spec.cwd.exists());
    }

    #[tokio::test]
    async fn test_verbosity_zero_keeps_work_dir() {
        let runner = MockProcessRunner::new_success("");
        let options = options(json!({"hosts": "all", "verbosity": 0}));

        execute(&runner, "ansible", &options, &context())
            .await
            .unwrap();

        let cwd = runner.last_call().unwrap().spec.cwd;
        assert!(cwd.is_dir());
        std::fs::remove_dir_all(cwd).unwrap();
    }

    #[tokio::test]
    async fn test_runner_failure_propagates_and_cleans_up() {
        let runner = MockProcessRunner::new_spawn_fail("No such file or directory");
        let options = options(json!({"hosts": "all"}));

        let err = execute(&runner, "ansible", &options, &context())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("No such file or directory"));
        let cwd = runner.last_call().unwrap().spec.cwd;
        assert!(!cwd.exists());
    }

    #[test]
    fn test_prepare_is_computed_once() {
        let kwargs: Kwargs = serde_json::from_value(json!({
            "hosts": "all",
            "inventory": {"all": {"hosts": {}}},
        }))
        .unwrap();
        let options = ModuleOptions::from_kwargs(kwargs).unwrap();

        let invocation = prepare("ansible", &options, BTreeMap::new(), &context()).unwrap();
        let inventory = invocation.staged.inventory.clone().unwrap();

        assert!(inventory.starts_with(invocation.work_dir.path()));
        assert!(inventory.is_file());
        assert_eq!(invocation.spec.cwd, invocation.work_dir.path());
    }
}
