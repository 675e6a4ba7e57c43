// Create Plan Use Case

use crate::constants::CAPABILITIES_MAP_NAME;
use crate::domain::{ActionResult, CapabilitiesMap, PlanVariables};
use crate::error::Result;
use crate::port::{ObjectStore, ObjectStoreError, WorkflowClient};
use tracing::{info, warn};

/// Read the container's capabilities map and create the plan's workflow
/// environment
///
/// Known failures come back as `ActionResult::Error`; transport errors and
/// workflow client errors propagate.
pub async fn execute(
    object_store: &dyn ObjectStore,
    workflow: &dyn WorkflowClient,
    container: &str,
) -> Result<ActionResult<()>> {
    let body = match object_store.get_object(container, CAPABILITIES_MAP_NAME).await {
        Ok((_, body)) => body,
        Err(ObjectStoreError::Client(detail)) => {
            warn!(container = %container, error = %detail, "Capabilities map not found");
            return Ok(ActionResult::error(format!(
                "File missing from container: {}",
                detail
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let map = match String::from_utf8(body)
        .map_err(|e| format!("Error parsing the yaml file: {}", e))
        .and_then(|doc| {
            CapabilitiesMap::parse(CAPABILITIES_MAP_NAME, &doc).map_err(|e| e.to_string())
        }) {
        Ok(map) => map,
        Err(message) => {
            warn!(container = %container, error = %message, "Invalid capabilities map");
            return Ok(ActionResult::error(message));
        }
    };

    let variables = PlanVariables::from_capabilities(&map).to_json()?;
    workflow.create_environment(container, &variables).await?;

    info!(
        container = %container,
        template = %map.root_template,
        optional_environments = map.optional_environment_files().len(),
        "Plan created"
    );
    Ok(ActionResult::Data(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::object_store::mocks::InMemoryObjectStore;
    use crate::port::workflow_client::mocks::InMemoryWorkflowClient;
    use crate::port::WorkflowError;
    use serde_json::json;

    const MAPPING_YAML_CONTENTS: &str = r#"root_template: /path/to/overcloud.yaml
root_environment: /path/to/environment.yaml
topics:
  - title: Fake Single Environment Group Configuration
    description:
    environment_groups:
      - title:
        description: Random fake string of text
        environments:
          - file: /path/to/network-isolation.json
            title: Default Configuration
            description:
"#;

    const INVALID_MAPPING_CONTENTS: &str = r#"
root_environment: /path/to/environment.yaml
topics:
  - title: Fake Single Environment Group Configuration
    description:
    environment_groups:
      - title:
        description: Random fake string of text
        environments:
          - file: /path/to/network-isolation.json
            title: Default Configuration
            description:
"#;

    fn store_with(contents: &str) -> InMemoryObjectStore {
        InMemoryObjectStore::new().with_object("test-container", "capabilities-map.yaml", contents)
    }

    #[tokio::test]
    async fn test_creates_environment() {
        let store = store_with(MAPPING_YAML_CONTENTS);
        let workflow = InMemoryWorkflowClient::new();

        let result = execute(&store, &workflow, "test-container").await.unwrap();

        assert_eq!(result, ActionResult::Data(()));
        assert_eq!(
            store.get_object_calls(),
            vec![(
                "test-container".to_string(),
                "capabilities-map.yaml".to_string()
            )]
        );

        let calls = workflow.create_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "test-container");
        let variables: serde_json::Value = serde_json::from_str(&calls[0].1).unwrap();
        assert_eq!(
            variables,
            json!({
                "environments": [{"path": "/path/to/environment.yaml"}],
                "template": "/path/to/overcloud.yaml"
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_yaml() {
        let store = store_with("invalid: %");
        let workflow = InMemoryWorkflowClient::new();

        let result = execute(&store, &workflow, "test-container").await.unwrap();

        let message = result.error_message().unwrap();
        assert_eq!(message.split(':').next(), Some("Error parsing the yaml file"));
        assert!(workflow.create_calls().is_empty());
    }

    #[tokio::test]
    async fn test_plain_string() {
        let store = store_with("this is just a string");
        let workflow = InMemoryWorkflowClient::new();

        let result = execute(&store, &workflow, "test-container").await.unwrap();

        let message = result.error_message().unwrap();
        assert_eq!(message.split(':').next(), Some("Error occurred creating plan"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let store = InMemoryObjectStore::new()
            .failing_objects(ObjectStoreError::Client("atest2".to_string()));
        let workflow = InMemoryWorkflowClient::new();

        let result = execute(&store, &workflow, "test-container").await.unwrap();

        assert_eq!(
            result,
            ActionResult::error("File missing from container: atest2")
        );
    }

    #[tokio::test]
    async fn test_missing_key() {
        let store = store_with(INVALID_MAPPING_CONTENTS);
        let workflow = InMemoryWorkflowClient::new();

        let result = execute(&store, &workflow, "test-container").await.unwrap();

        assert_eq!(
            result,
            ActionResult::error("capabilities-map.yaml missing key: 'root_template'")
        );
    }

    #[tokio::test]
    async fn test_non_utf8_body() {
        let store = InMemoryObjectStore::new().with_object(
            "test-container",
            "capabilities-map.yaml",
            vec![0xff, 0xfe, 0x00],
        );
        let workflow = InMemoryWorkflowClient::new();

        let result = execute(&store, &workflow, "test-container").await.unwrap();

        assert!(result
            .error_message()
            .unwrap()
            .starts_with("Error parsing the yaml file"));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let store = InMemoryObjectStore::new()
            .failing_objects(ObjectStoreError::Transport("connection refused".to_string()));
        let workflow = InMemoryWorkflowClient::new();

        let err = execute(&store, &workflow, "test-container")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_workflow_error_propagates() {
        let store = store_with(MAPPING_YAML_CONTENTS);
        let workflow = InMemoryWorkflowClient::new().failing_creates(WorkflowError::Api {
            status: 409,
            message: "Duplicate entry for Environment".to_string(),
        });

        let err = execute(&store, &workflow, "test-container")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Duplicate entry"));
    }
}
