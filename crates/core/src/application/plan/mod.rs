// Plan Service - containers and workflow environments

pub mod container;
pub mod create;
pub mod list;

use crate::constants::{TRIPLEO_META_USAGE_KEY, TRIPLEO_META_USAGE_PLAN};
use crate::domain::ActionResult;
use crate::error::Result;
use crate::port::{Headers, ObjectStore, WorkflowClient};
use std::sync::Arc;

/// Metadata headers of every plan container
pub fn default_container_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert(
        TRIPLEO_META_USAGE_KEY.to_string(),
        TRIPLEO_META_USAGE_PLAN.to_string(),
    );
    headers
}

/// Plan Service
pub struct PlanService {
    object_store: Arc<dyn ObjectStore>,
    workflow: Arc<dyn WorkflowClient>,
}

impl PlanService {
    pub fn new(object_store: Arc<dyn ObjectStore>, workflow: Arc<dyn WorkflowClient>) -> Self {
        Self {
            object_store,
            workflow,
        }
    }

    /// Create an empty plan container
    pub async fn create_container(&self, container: &str) -> Result<ActionResult<()>> {
        container::execute(self.object_store.as_ref(), container).await
    }

    /// Register the workflow environment of an uploaded plan
    pub async fn create_plan(&self, container: &str) -> Result<ActionResult<()>> {
        create::execute(self.object_store.as_ref(), self.workflow.as_ref(), container).await
    }

    /// Names of all plans
    pub async fn list_plans(&self) -> Result<Vec<String>> {
        list::execute(self.object_store.as_ref(), self.workflow.as_ref()).await
    }
}
