// Create Container Use Case

use super::default_container_headers;
use crate::domain::ActionResult;
use crate::error::Result;
use crate::port::ObjectStore;
use tracing::{info, warn};

/// Create a plan container unless one with the same name exists
///
/// Object store errors propagate.
pub async fn execute(object_store: &dyn ObjectStore, container: &str) -> Result<ActionResult<()>> {
    let (_, containers) = object_store.get_account().await?;

    if containers.iter().any(|c| c.name == container) {
        warn!(container = %container, "Container already exists");
        return Ok(ActionResult::error(format!(
            "A container with the name {} already exists.",
            container
        )));
    }

    object_store
        .put_container(container, &default_container_headers())
        .await?;

    info!(container = %container, "Plan container created");
    Ok(ActionResult::Data(()))
}
