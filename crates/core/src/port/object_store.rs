// Object Store Port (Swift)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Response/request headers, names lower-cased
pub type Headers = BTreeMap<String, String>;

/// Container entry of an account listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub name: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub bytes: u64,
}

/// Object entry of a container listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub name: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Object store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectStoreError {
    /// The service answered with an error status
    #[error("{0}")]
    Client(String),

    /// The service could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Object store interface, one request per call, single page listings
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Account headers and container listing
    async fn get_account(&self) -> Result<(Headers, Vec<ContainerSummary>), ObjectStoreError>;

    /// Container headers and object listing
    async fn get_container(
        &self,
        container: &str,
    ) -> Result<(Headers, Vec<ObjectSummary>), ObjectStoreError>;

    /// Create (or update) a container with the given metadata headers
    async fn put_container(&self, container: &str, headers: &Headers)
        -> Result<(), ObjectStoreError>;

    /// Object headers and body
    async fn get_object(
        &self,
        container: &str,
        object: &str,
    ) -> Result<(Headers, Vec<u8>), ObjectStoreError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Default)]
    struct Container {
        headers: Headers,
        objects: BTreeMap<String, Vec<u8>>,
    }

    /// In-memory object store recording writes
    #[derive(Default)]
    pub struct InMemoryObjectStore {
        containers: Arc<Mutex<BTreeMap<String, Container>>>,
        put_calls: Arc<Mutex<Vec<(String, Headers)>>>,
        get_object_calls: Arc<Mutex<Vec<(String, String)>>>,
        object_error: Arc<Mutex<Option<ObjectStoreError>>>,
    }

    impl InMemoryObjectStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_container(self, name: &str, headers: Headers) -> Self {
            self.containers.lock().unwrap().insert(
                name.to_string(),
                Container {
                    headers,
                    objects: BTreeMap::new(),
                },
            );
            self
        }

        pub fn with_object(self, container: &str, object: &str, body: impl Into<Vec<u8>>) -> Self {
            self.containers
                .lock()
                .unwrap()
                .entry(container.to_string())
                .or_default()
                .objects
                .insert(object.to_string(), body.into());
            self
        }

        /// Every `get_object` fails with this error
        pub fn failing_objects(self, error: ObjectStoreError) -> Self {
            *self.object_error.lock().unwrap() = Some(error);
            self
        }

        pub fn put_calls(&self) -> Vec<(String, Headers)> {
            self.put_calls.lock().unwrap().clone()
        }

        pub fn get_object_calls(&self) -> Vec<(String, String)> {
            self.get_object_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ObjectStore for InMemoryObjectStore {
        async fn get_account(&self) -> Result<(Headers, Vec<ContainerSummary>), ObjectStoreError> {
            let containers = self.containers.lock().unwrap();
            let listing = containers
                .iter()
                .map(|(name, c)| ContainerSummary {
                    name: name.clone(),
                    count: c.objects.len() as u64,
                    bytes: c.objects.values().map(|b| b.len() as u64).sum(),
                })
                .collect();
            Ok((Headers::new(), listing))
        }

        async fn get_container(
            &self,
            container: &str,
        ) -> Result<(Headers, Vec<ObjectSummary>), ObjectStoreError> {
            let containers = self.containers.lock().unwrap();
            let c = containers.get(container).ok_or_else(|| {
                ObjectStoreError::Client(format!(
                    "Container GET failed: memory://{} 404 Not Found",
                    container
                ))
            })?;

            let objects = c
                .objects
                .iter()
                .map(|(name, body)| ObjectSummary {
                    name: name.clone(),
                    bytes: body.len() as u64,
                    content_type: None,
                })
                .collect();
            Ok((c.headers.clone(), objects))
        }

        async fn put_container(
            &self,
            container: &str,
            headers: &Headers,
        ) -> Result<(), ObjectStoreError> {
            self.put_calls
                .lock()
                .unwrap()
                .push((container.to_string(), headers.clone()));

            let mut containers = self.containers.lock().unwrap();
            let entry = containers.entry(container.to_string()).or_default();
            entry.headers.extend(headers.clone());
            Ok(())
        }

        async fn get_object(
            &self,
            container: &str,
            object: &str,
        ) -> Result<(Headers, Vec<u8>), ObjectStoreError> {
            self.get_object_calls
                .lock()
                .unwrap()
                .push((container.to_string(), object.to_string()));

            if let Some(err) = self.object_error.lock().unwrap().clone() {
                return Err(err);
            }

            self.containers
                .lock()
                .unwrap()
                .get(container)
                .and_then(|c| c.objects.get(object))
                .map(|body| (Headers::new(), body.clone()))
                .ok_or_else(|| {
                    ObjectStoreError::Client(format!(
                        "Object GET failed: memory://{}/{} 404 Not Found",
                        container, object
                    ))
                })
        }
    }
}
