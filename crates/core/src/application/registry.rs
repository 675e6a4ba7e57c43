// Action Registry - dispatch by registered action name

use crate::application::ansible::AnsibleService;
use crate::application::plan::PlanService;
use crate::domain::{ActionContext, ActionResult, Kwargs, ModuleOptions, PlaybookOptions};
use crate::error::{AppError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Registered actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    Ansible,
    AnsiblePlaybook,
    CreateContainer,
    CreatePlan,
    ListPlans,
}

impl ActionName {
    pub const ALL: [ActionName; 5] = [
        ActionName::Ansible,
        ActionName::AnsiblePlaybook,
        ActionName::CreateContainer,
        ActionName::CreatePlan,
        ActionName::ListPlans,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::Ansible => "tripleo.ansible",
            ActionName::AnsiblePlaybook => "tripleo.ansible-playbook",
            ActionName::CreateContainer => "tripleo.plan.create_container",
            ActionName::CreatePlan => "tripleo.plan.create",
            ActionName::ListPlans => "tripleo.plan.list",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown action: {}", s)))
    }
}

#[derive(Debug, Deserialize)]
struct ContainerInput {
    container: String,
}

/// Dispatches action invocations to the services
///
/// Plan actions need an object store and a workflow client; without them
/// the registry only serves the ansible actions.
pub struct ActionRegistry {
    ansible: AnsibleService,
    plans: Option<PlanService>,
}

impl ActionRegistry {
    pub fn new(ansible: AnsibleService, plans: Option<PlanService>) -> Self {
        Self { ansible, plans }
    }

    /// Run one action
    ///
    /// # Arguments
    ///
    /// * `name` - Registered action
    /// * `kwargs` - Keyword arguments of the invocation
    /// * `ctx` - Caller authentication context
    pub async fn run(
        &self,
        name: ActionName,
        kwargs: Kwargs,
        ctx: &ActionContext,
    ) -> Result<ActionResult<Value>> {
        info!(action = %name, "Running action");

        match name {
            ActionName::Ansible => {
                let options = ModuleOptions::from_kwargs(kwargs)?;
                let result = self.ansible.run_module(&options, ctx).await?;
                to_value(result)
            }
            ActionName::AnsiblePlaybook => {
                let options = PlaybookOptions::from_kwargs(kwargs)?;
                let result = self.ansible.run_playbook(&options, ctx).await?;
                to_value(result)
            }
            ActionName::CreateContainer => {
                let input = container_input(kwargs)?;
                let result = self.plans()?.create_container(&input.container).await?;
                Ok(result.map(|()| Value::Null))
            }
            ActionName::CreatePlan => {
                let input = container_input(kwargs)?;
                let result = self.plans()?.create_plan(&input.container).await?;
                Ok(result.map(|()| Value::Null))
            }
            ActionName::ListPlans => {
                let plans = self.plans()?.list_plans().await?;
                Ok(ActionResult::Data(serde_json::to_value(plans)?))
            }
        }
    }

    fn plans(&self) -> Result<&PlanService> {
        self.plans.as_ref().ok_or_else(|| {
            AppError::Config("object store and workflow endpoints are not configured".to_string())
        })
    }
}

fn container_input(kwargs: Kwargs) -> Result<ContainerInput> {
    serde_json::from_value(Value::Object(kwargs))
        .map_err(|e| AppError::Validation(format!("Invalid input: {}", e)))
}

fn to_value<T: serde::Serialize>(result: ActionResult<T>) -> Result<ActionResult<Value>> {
    Ok(match result {
        ActionResult::Data(data) => ActionResult::Data(serde_json::to_value(data)?),
        ActionResult::Error(message) => ActionResult::Error(message),
    })
}
