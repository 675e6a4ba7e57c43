//! Runtime settings and service wiring

use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use tripleo_actions_core::application::{ActionRegistry, AnsibleBinaries, AnsibleService, PlanService};
use tripleo_actions_core::constants::{ANSIBLE_BIN, ANSIBLE_PLAYBOOK_BIN};
use tripleo_actions_core::domain::ActionContext;
use tripleo_actions_infra_openstack::{Endpoint, MistralClient, SwiftClient};
use tripleo_actions_infra_system::SubprocessRunner;

/// Settings shared by every subcommand
#[derive(Args, Debug)]
pub struct Settings {
    /// Keystone URL exported to ansible as OS_AUTH_URL
    #[arg(long, env = "OS_AUTH_URL", global = true)]
    pub auth_url: Option<String>,

    /// User name exported to ansible as OS_USERNAME
    #[arg(long, env = "OS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Auth token for Swift/Mistral, exported to ansible as OS_AUTH_TOKEN
    #[arg(long, env = "OS_AUTH_TOKEN", global = true, hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Project name exported to ansible as OS_PROJECT_NAME
    #[arg(long, env = "OS_PROJECT_NAME", global = true)]
    pub project_name: Option<String>,

    /// Swift account URL
    #[arg(long, env = "OS_OBJECT_STORE_URL", global = true)]
    pub object_store_url: Option<String>,

    /// Mistral v2 URL
    #[arg(long, env = "OS_WORKFLOW_URL", global = true)]
    pub workflow_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "TRIPLEO_ACTIONS_HTTP_TIMEOUT_SECS", default_value = "30", global = true)]
    pub http_timeout_secs: u64,

    /// ansible executable
    #[arg(long, env = "TRIPLEO_ACTIONS_ANSIBLE_BIN", default_value = ANSIBLE_BIN, global = true)]
    pub ansible_bin: String,

    /// ansible-playbook executable
    #[arg(
        long,
        env = "TRIPLEO_ACTIONS_ANSIBLE_PLAYBOOK_BIN",
        default_value = ANSIBLE_PLAYBOOK_BIN,
        global = true
    )]
    pub ansible_playbook_bin: String,

    /// Restrict the environment ansible inherits to these parent variables
    /// (comma-separated). Unset: ansible inherits the full environment.
    #[arg(
        long,
        env = "TRIPLEO_ACTIONS_ENV_ALLOWLIST",
        value_delimiter = ',',
        global = true
    )]
    pub env_allowlist: Option<Vec<String>>,

    /// Log format: json or pretty
    #[arg(long, env = "TRIPLEO_ACTIONS_LOG_FORMAT", default_value = "pretty", global = true)]
    pub log_format: String,
}

impl Settings {
    pub fn context(&self) -> ActionContext {
        ActionContext {
            auth_uri: self.auth_url.clone(),
            user_name: self.username.clone(),
            auth_token: self.auth_token.clone(),
            project_name: self.project_name.clone(),
        }
    }

    /// Wire adapters into a registry. Plan actions are only available when
    /// both service URLs are set.
    pub fn registry(&self) -> Result<ActionRegistry> {
        let runner = match &self.env_allowlist {
            Some(names) => SubprocessRunner::with_env_allowlist(
                names
                    .iter()
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect(),
            ),
            None => SubprocessRunner::new(),
        };

        let ansible = AnsibleService::new(
            Arc::new(runner),
            AnsibleBinaries {
                ansible: self.ansible_bin.clone(),
                ansible_playbook: self.ansible_playbook_bin.clone(),
            },
        );

        let plans = match (&self.object_store_url, &self.workflow_url) {
            (Some(object_store_url), Some(workflow_url)) => {
                let timeout = Duration::from_secs(self.http_timeout_secs);
                let token = self.auth_token.as_deref();

                let swift = Endpoint::new(object_store_url, token, timeout)
                    .context("Invalid object store endpoint")?;
                let mistral = Endpoint::new(workflow_url, token, timeout)
                    .context("Invalid workflow endpoint")?;

                info!(
                    object_store = %object_store_url,
                    workflow = %workflow_url,
                    "Plan actions enabled"
                );

                Some(PlanService::new(
                    Arc::new(SwiftClient::new(swift)),
                    Arc::new(MistralClient::new(mistral)),
                ))
            }
            _ => None,
        };

        Ok(ActionRegistry::new(ansible, plans))
    }
}
