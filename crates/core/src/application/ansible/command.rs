// Argument vector and environment builders
//
// Pure functions: staging has already happened, every path is resolved.

use crate::constants::MAX_VERBOSITY;
use crate::domain::options::{is_present, render_list, render_scalar};
use crate::domain::{ActionContext, CommonOptions, ModuleOptions, PlaybookOptions};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Files resolved for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedPaths {
    pub inventory: Option<PathBuf>,
    pub private_key: Option<PathBuf>,
    pub playbook: Option<PathBuf>,
}

/// `-v` .. `-vvvvv`; anything outside 1..=5 renders nothing
pub fn verbosity_flag(verbosity: i64) -> Option<String> {
    (1..=MAX_VERBOSITY)
        .contains(&verbosity)
        .then(|| format!("-{}", "v".repeat(verbosity as usize)))
}

/// Arguments of `ansible <hosts> ...`
pub fn module_args(options: &ModuleOptions, staged: &StagedPaths) -> Vec<String> {
    let mut args = ArgList::default();

    args.push(render_scalar(&options.hosts));
    args.push_opt(verbosity_flag(options.common.verbosity));
    args.flag_value("--module-name", &options.module);
    args.flag_value("--args", &options.module_args);
    args.target_flags(&options.common);
    args.connection_flags(&options.common, staged);

    args.into_inner()
}

/// Arguments of `ansible-playbook ... <playbook> ...`
pub fn playbook_args(options: &PlaybookOptions, staged: &StagedPaths) -> Vec<String> {
    let mut args = ArgList::default();

    args.push_opt(verbosity_flag(options.common.verbosity));
    args.push_opt(staged.playbook.as_deref().map(path_string));
    args.target_flags(&options.common);
    args.flag_if("--flush-cache", &options.flush_cache);
    args.connection_flags(&options.common, staged);
    args.flag_list("--tags", &options.tags);
    args.flag_list("--skip-tags", &options.skip_tags);

    args.into_inner()
}

/// Subprocess environment: HOME, then extra variables, then credentials
pub fn environment(
    work_dir: &Path,
    extra_env: BTreeMap<String, String>,
    credentials: Option<&ActionContext>,
) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert("HOME".to_string(), path_string(work_dir));
    env.extend(extra_env);

    if let Some(ctx) = credentials {
        env.extend(ctx.credential_env());
    }

    env
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[derive(Default)]
struct ArgList(Vec<String>);

impl ArgList {
    fn push(&mut self, arg: String) {
        self.0.push(arg);
    }

    fn push_opt(&mut self, arg: Option<String>) {
        if let Some(arg) = arg {
            self.0.push(arg);
        }
    }

    fn flag_value(&mut self, flag: &str, value: &Value) {
        if is_present(value) {
            self.0.push(flag.to_string());
            self.0.push(render_scalar(value));
        }
    }

    fn flag_list(&mut self, flag: &str, value: &Value) {
        if is_present(value) {
            self.0.push(flag.to_string());
            self.0.push(render_list(value));
        }
    }

    fn flag_if(&mut self, flag: &str, value: &Value) {
        if is_present(value) {
            self.0.push(flag.to_string());
        }
    }

    fn flag_path(&mut self, flag: &str, path: Option<&Path>) {
        if let Some(path) = path {
            self.0.push(flag.to_string());
            self.0.push(path_string(path));
        }
    }

    // limit / user / privilege escalation / extra vars
    fn target_flags(&mut self, common: &CommonOptions) {
        self.flag_value("--limit", &common.limit_hosts);
        self.flag_value("--user", &common.remote_user);
        self.flag_if("--become", &common.become_flag);
        self.flag_value("--become-user", &common.become_user);
        self.flag_value("--extra-vars", &common.extra_vars);
    }

    // forks / ssh / timeout / inventory / key
    fn connection_flags(&mut self, common: &CommonOptions, staged: &StagedPaths) {
        self.flag_value("--forks", &common.forks);
        self.flag_value("--ssh-common-args", &common.ssh_common_args);
        self.flag_value("--ssh-extra-args", &common.ssh_extra_args);
        self.flag_value("--timeout", &common.timeout);
        self.flag_path("--inventory-file", staged.inventory.as_deref());
        self.flag_path("--private-key", staged.private_key.as_deref());
    }

    fn into_inner(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Kwargs;
    use serde_json::json;

    fn module(value: Value) -> ModuleOptions {
        ModuleOptions::from_kwargs(kwargs(value)).unwrap()
    }

    fn playbook(value: Value) -> PlaybookOptions {
        PlaybookOptions::from_kwargs(kwargs(value)).unwrap()
    }

    fn kwargs(value: Value) -> Kwargs {
        match value {
            Value::Object(map) => map,
            _ => panic!("kwargs must be an object"),
        }
    }

    #[test]
    fn test_verbosity_flag_range() {
        assert_eq!(verbosity_flag(0), None);
        assert_eq!(verbosity_flag(1).as_deref(), Some("-v"));
        assert_eq!(verbosity_flag(2).as_deref(), Some("-vv"));
        assert_eq!(verbosity_flag(3).as_deref(), Some("-vvv"));
        assert_eq!(verbosity_flag(4).as_deref(), Some("-vvvv"));
        assert_eq!(verbosity_flag(5).as_deref(), Some("-vvvvv"));
        assert_eq!(verbosity_flag(6), None);
        assert_eq!(verbosity_flag(42), None);
        assert_eq!(verbosity_flag(-1), None);
    }

    #[test]
    fn test_module_minimal() {
        let options = module(json!({"hosts": "all", "verbosity": 0}));
        assert_eq!(module_args(&options, &StagedPaths::default()), vec!["all"]);
    }

    #[test]
    fn test_module_default_verbosity_after_hosts() {
        let options = module(json!({"hosts": "overcloud", "module": "ping"}));
        assert_eq!(
            module_args(&options, &StagedPaths::default()),
            vec!["overcloud", "-vvvvv", "--module-name", "ping"]
        );
    }

    #[test]
    fn test_module_full() {
        let options = module(json!({
            "hosts": "overcloud",
            "module": "shell",
            "module_args": {"cmd": "uptime"},
            "limit_hosts": "controller-0",
            "remote_user": "heat-admin",
            "become": true,
            "become_user": "root",
            "extra_vars": {"role": "Controller"},
            "verbosity": 2,
            "forks": 10,
            "timeout": "30",
            "ssh_common_args": ["-o", "StrictHostKeyChecking=no"],
            "ssh_extra_args": "-o ConnectTimeout=5",
        }));
        let staged = StagedPaths {
            inventory: Some(PathBuf::from("/tmp/w/inventory.yaml")),
            private_key: Some(PathBuf::from("/tmp/w/ssh_private_key")),
            playbook: None,
        };

        assert_eq!(
            module_args(&options, &staged),
            vec![
                "overcloud",
                "-vv",
                "--module-name",
                "shell",
                "--args",
                r#"{"cmd": "uptime"}"#,
                "--limit",
                "controller-0",
                "--user",
                "heat-admin",
                "--become",
                "--become-user",
                "root",
                "--extra-vars",
                r#"{"role": "Controller"}"#,
                "--forks",
                "10",
                "--ssh-common-args",
                r#"["-o", "StrictHostKeyChecking=no"]"#,
                "--ssh-extra-args",
                "-o ConnectTimeout=5",
                "--timeout",
                "30",
                "--inventory-file",
                "/tmp/w/inventory.yaml",
                "--private-key",
                "/tmp/w/ssh_private_key",
            ]
        );
    }

    #[test]
    fn test_falsy_options_omitted() {
        let options = module(json!({
            "hosts": "all",
            "verbosity": 0,
            "become": false,
            "forks": 0,
            "limit_hosts": "",
            "extra_vars": {},
            "module_args": null,
        }));
        assert_eq!(module_args(&options, &StagedPaths::default()), vec!["all"]);
    }

    #[test]
    fn test_playbook_full() {
        let options = playbook(json!({
            "playbook": "ignored-here",
            "verbosity": 1,
            "limit_hosts": "compute",
            "become": true,
            "flush_cache": true,
            "forks": 5,
            "tags": ["deploy", "config"],
            "skip_tags": "validation",
        }));
        let staged = StagedPaths {
            inventory: Some(PathBuf::from("/etc/ansible/hosts")),
            private_key: None,
            playbook: Some(PathBuf::from("/tmp/w/playbook.yaml")),
        };

        assert_eq!(
            playbook_args(&options, &staged),
            vec![
                "-v",
                "/tmp/w/playbook.yaml",
                "--limit",
                "compute",
                "--become",
                "--flush-cache",
                "--forks",
                "5",
                "--inventory-file",
                "/etc/ansible/hosts",
                "--tags",
                "deploy,config",
                "--skip-tags",
                "validation",
            ]
        );
    }

    #[test]
    fn test_playbook_without_verbosity_flag() {
        let options = playbook(json!({"playbook": "site.yaml", "verbosity": 6}));
        let staged = StagedPaths {
            playbook: Some(PathBuf::from("/srv/site.yaml")),
            ..Default::default()
        };

        assert_eq!(playbook_args(&options, &staged), vec!["/srv/site.yaml"]);
    }

    #[test]
    fn test_environment_layering() {
        let mut extra = BTreeMap::new();
        extra.insert("HOME".to_string(), "/override".to_string());
        extra.insert("ANSIBLE_FORCE_COLOR".to_string(), "1".to_string());

        let ctx = ActionContext {
            auth_uri: Some("http://keystone:5000".to_string()),
            user_name: Some("admin".to_string()),
            auth_token: Some("token".to_string()),
            project_name: Some("admin".to_string()),
        };

        let without = environment(Path::new("/tmp/w"), BTreeMap::new(), None);
        assert_eq!(without.len(), 1);
        assert_eq!(without["HOME"], "/tmp/w");

        let with = environment(Path::new("/tmp/w"), extra, Some(&ctx));
        assert_eq!(with["HOME"], "/override");
        assert_eq!(with["ANSIBLE_FORCE_COLOR"], "1");
        assert_eq!(with["OS_AUTH_URL"], "http://keystone:5000");
        assert_eq!(with["OS_AUTH_TOKEN"], "token");
        assert_eq!(with.len(), 6);
    }
}
