// Ansible option records
//
// Keyword arguments arrive as a JSON object. Each option is independently
// optional and "present" only when truthy, so most fields stay loosely typed.

use super::error::{DomainError, Result, EXTRA_ENV_NOT_A_DICT};
use crate::constants::DEFAULT_VERBOSITY;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keyword arguments as passed by the workflow engine
pub type Kwargs = Map<String, Value>;

/// Options shared by the module and playbook invokers
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommonOptions {
    pub limit_hosts: Value,
    pub remote_user: Value,
    #[serde(rename = "become")]
    pub become_flag: Value,
    pub become_user: Value,
    pub extra_vars: Value,
    pub inventory: Value,
    pub verbosity: i64,
    pub ssh_private_key: Value,
    pub forks: Value,
    pub timeout: Value,
    pub ssh_extra_args: Value,
    pub ssh_common_args: Value,
    pub use_openstack_credentials: Value,
    pub extra_env_variables: Value,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            limit_hosts: Value::Null,
            remote_user: Value::Null,
            become_flag: Value::Null,
            become_user: Value::Null,
            extra_vars: Value::Null,
            inventory: Value::Null,
            verbosity: DEFAULT_VERBOSITY,
            ssh_private_key: Value::Null,
            forks: Value::Null,
            timeout: Value::Null,
            ssh_extra_args: Value::Null,
            ssh_common_args: Value::Null,
            use_openstack_credentials: Value::Null,
            extra_env_variables: Value::Null,
        }
    }
}

impl CommonOptions {
    /// Extra environment for the subprocess
    ///
    /// # Errors
    /// `DomainError::InvalidEnvironment` when the value is present but not a mapping
    pub fn extra_env(&self) -> Result<BTreeMap<String, String>> {
        if !is_present(&self.extra_env_variables) {
            return Ok(BTreeMap::new());
        }

        match &self.extra_env_variables {
            Value::Object(vars) => Ok(vars
                .iter()
                .map(|(k, v)| (k.clone(), render_scalar(v)))
                .collect()),
            _ => Err(DomainError::InvalidEnvironment(EXTRA_ENV_NOT_A_DICT)),
        }
    }

    pub fn wants_openstack_credentials(&self) -> bool {
        is_present(&self.use_openstack_credentials)
    }

    /// Working directory is kept only at verbosity zero
    pub fn keeps_work_dir(&self) -> bool {
        self.verbosity == 0
    }
}

/// `ansible` module invocation options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModuleOptions {
    pub hosts: Value,
    pub module: Value,
    pub module_args: Value,
    #[serde(flatten)]
    pub common: CommonOptions,
}

impl ModuleOptions {
    pub fn from_kwargs(kwargs: Kwargs) -> Result<Self> {
        let options: Self = serde_json::from_value(Value::Object(kwargs))
            .map_err(|e| DomainError::InvalidOptions(e.to_string()))?;

        if !is_present(&options.hosts) {
            return Err(DomainError::MissingOption("hosts"));
        }

        Ok(options)
    }
}

/// `ansible-playbook` invocation options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaybookOptions {
    pub playbook: Value,
    pub tags: Value,
    pub skip_tags: Value,
    pub flush_cache: Value,
    #[serde(flatten)]
    pub common: CommonOptions,
}

impl PlaybookOptions {
    pub fn from_kwargs(kwargs: Kwargs) -> Result<Self> {
        let options: Self = serde_json::from_value(Value::Object(kwargs))
            .map_err(|e| DomainError::InvalidOptions(e.to_string()))?;

        if !is_present(&options.playbook) {
            return Err(DomainError::MissingOption("playbook"));
        }

        Ok(options)
    }
}

/// Truthiness of an option value: null, false, zero and empty values are absent
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Render a flag value: strings verbatim, everything else as spaced JSON
pub fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => super::json::to_string(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Render a flag value that may also be given as a list (`--tags a,b`)
pub fn render_list(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(render_scalar)
            .collect::<Vec<_>>()
            .join(","),
        other => render_scalar(other),
    }
}
