// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// Everything in here propagates to the caller. Failures that an action
/// reports back as data live in `ActionResult::Error` instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Execution error: {0}")]
    Execution(#[from] crate::port::ExecutionError),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] crate::port::ObjectStoreError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] crate::port::WorkflowError),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
