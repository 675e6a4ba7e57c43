// Workflow Client Port (Mistral environments)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workflow environment as returned by a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSummary {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Workflow client errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Workflow environment API
#[async_trait]
pub trait WorkflowClient: Send + Sync {
    /// Create an environment; `variables` is a JSON document
    async fn create_environment(&self, name: &str, variables: &str) -> Result<(), WorkflowError>;

    /// List all environments (single page)
    async fn list_environments(&self) -> Result<Vec<EnvironmentSummary>, WorkflowError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory workflow client recording created environments
    #[derive(Default)]
    pub struct InMemoryWorkflowClient {
        environments: Arc<Mutex<Vec<(String, String)>>>,
        create_calls: Arc<Mutex<Vec<(String, String)>>>,
        create_error: Arc<Mutex<Option<WorkflowError>>>,
    }

    impl InMemoryWorkflowClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_environment(self, name: &str) -> Self {
            self.environments
                .lock()
                .unwrap()
                .push((name.to_string(), "{}".to_string()));
            self
        }

        /// Every `create_environment` fails with this error
        pub fn failing_creates(self, error: WorkflowError) -> Self {
            *self.create_error.lock().unwrap() = Some(error);
            self
        }

        pub fn create_calls(&self) -> Vec<(String, String)> {
            self.create_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WorkflowClient for InMemoryWorkflowClient {
        async fn create_environment(&self, name: &str, variables: &str) -> Result<(), WorkflowError> {
            self.create_calls
                .lock()
                .unwrap()
                .push((name.to_string(), variables.to_string()));

            if let Some(err) = self.create_error.lock().unwrap().clone() {
                return Err(err);
            }

            self.environments
                .lock()
                .unwrap()
                .push((name.to_string(), variables.to_string()));
            Ok(())
        }

        async fn list_environments(&self) -> Result<Vec<EnvironmentSummary>, WorkflowError> {
            Ok(self
                .environments
                .lock()
                .unwrap()
                .iter()
                .map(|(name, _)| EnvironmentSummary {
                    name: name.clone(),
                    description: None,
                    scope: Some("private".to_string()),
                    created_at: None,
                })
                .collect())
        }
    }
}
