// Mistral workflow environment adapter
// reason: reqwest for the Mistral v2 HTTP API

use crate::endpoint::Endpoint;
use async_trait::async_trait;
use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use tripleo_actions_core::port::workflow_client::{
    EnvironmentSummary, WorkflowClient, WorkflowError,
};

#[derive(Debug, Serialize)]
struct CreateEnvironmentRequest<'a> {
    name: &'a str,
    variables: &'a str,
}

#[derive(Debug, Deserialize)]
struct Fault {
    faultstring: Option<String>,
}

/// Mistral v2 client
pub struct MistralClient {
    endpoint: Endpoint,
}

impl MistralClient {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    async fn check(response: Response) -> Result<Response, WorkflowError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Fault>(&body)
            .ok()
            .and_then(|fault| fault.faultstring)
            .unwrap_or(body);

        Err(WorkflowError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl WorkflowClient for MistralClient {
    async fn create_environment(&self, name: &str, variables: &str) -> Result<(), WorkflowError> {
        let url = self.endpoint.url(&["environments"]);
        debug!(url = %url, environment = %name, "Creating workflow environment");

        let response = self
            .endpoint
            .client()
            .post(url)
            .json(&CreateEnvironmentRequest { name, variables })
            .send()
            .await
            .map_err(|e| WorkflowError::Transport(e.to_string()))?;

        Self::check(response).await?;
        Ok(())
    }

    async fn list_environments(&self) -> Result<Vec<EnvironmentSummary>, WorkflowError> {
        let url = self.endpoint.url(&["environments"]);
        debug!(url = %url, "Listing workflow environments");

        let response = self
            .endpoint
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| WorkflowError::Transport(e.to_string()))?;

        let body: Value = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| WorkflowError::InvalidResponse(e.to_string()))?;

        parse_environment_list(body)
    }
}

/// `{"environments": [...]}`; any other shape is rejected
fn parse_environment_list(mut body: Value) -> Result<Vec<EnvironmentSummary>, WorkflowError> {
    let environments = match body.get_mut("environments").map(Value::take) {
        Some(list @ Value::Array(_)) => list,
        Some(other) => {
            return Err(WorkflowError::InvalidResponse(format!(
                "environments must be a list, found {}",
                other
            )))
        }
        None => {
            return Err(WorkflowError::InvalidResponse(
                "missing key: 'environments'".to_string(),
            ))
        }
    };

    serde_json::from_value(environments).map_err(|e| WorkflowError::InvalidResponse(e.to_string()))
}
