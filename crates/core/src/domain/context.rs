// Caller authentication context

use crate::constants::{OS_AUTH_TOKEN, OS_AUTH_URL, OS_PROJECT_NAME, OS_USERNAME};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Authentication context of the workflow execution that invoked an action
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ActionContext {
    pub auth_uri: Option<String>,
    pub user_name: Option<String>,
    pub auth_token: Option<String>,
    pub project_name: Option<String>,
}

impl ActionContext {
    /// `OS_*` variables for a subprocess. Unset fields are left out.
    pub fn credential_env(&self) -> BTreeMap<String, String> {
        [
            (OS_AUTH_URL, &self.auth_uri),
            (OS_USERNAME, &self.user_name),
            (OS_AUTH_TOKEN, &self.auth_token),
            (OS_PROJECT_NAME, &self.project_name),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
        .collect()
    }
}

// Keep the token out of logs
impl std::fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionContext")
            .field("auth_uri", &self.auth_uri)
            .field("user_name", &self.user_name)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .field("project_name", &self.project_name)
            .finish()
    }
}
