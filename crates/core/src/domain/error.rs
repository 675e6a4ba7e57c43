// Domain Error Types

use thiserror::Error;

/// Message returned when `extra_env_variables` is not a mapping
pub const EXTRA_ENV_NOT_A_DICT: &str = "extra_env_variables must be a dict";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Missing required option: {0}")]
    MissingOption(&'static str),

    #[error("{0}")]
    InvalidEnvironment(&'static str),
}

pub type Result<T> = std::result::Result<T, DomainError>;
