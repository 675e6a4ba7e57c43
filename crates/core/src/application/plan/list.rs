// List Plans Use Case

use crate::constants::TRIPLEO_META_USAGE_KEY;
use crate::error::Result;
use crate::port::{ObjectStore, WorkflowClient};
use std::collections::BTreeSet;
use tracing::debug;

/// Names that are both plan containers and workflow environments, sorted
pub async fn execute(
    object_store: &dyn ObjectStore,
    workflow: &dyn WorkflowClient,
) -> Result<Vec<String>> {
    let environments: BTreeSet<String> = workflow
        .list_environments()
        .await?
        .into_iter()
        .map(|env| env.name)
        .collect();

    let (_, containers) = object_store.get_account().await?;

    let mut plans = BTreeSet::new();
    for container in containers {
        let (headers, _) = object_store.get_container(&container.name).await?;
        let is_plan = headers
            .keys()
            .any(|key| key.eq_ignore_ascii_case(TRIPLEO_META_USAGE_KEY));

        if is_plan {
            plans.insert(container.name);
        }
    }

    debug!(
        plan_containers = plans.len(),
        environments = environments.len(),
        "Cross-referencing plans"
    );

    Ok(plans.intersection(&environments).cloned().collect())
}
