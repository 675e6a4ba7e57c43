// Port Layer - Interfaces for external collaborators

pub mod object_store;
pub mod process_runner;
pub mod workflow_client;

// Re-exports
pub use object_store::{ContainerSummary, Headers, ObjectStore, ObjectStoreError, ObjectSummary};
pub use process_runner::{CommandOutput, CommandSpec, ExecutionError, ProcessRunner};
pub use workflow_client::{EnvironmentSummary, WorkflowClient, WorkflowError};
