// Domain Layer - Pure action semantics and records

pub mod action_result;
pub mod capabilities;
pub mod context;
pub mod error;
pub mod json;
pub mod options;
pub mod plan;

// Re-exports
pub use action_result::ActionResult;
pub use capabilities::{
    CapabilitiesError, CapabilitiesMap, EnvironmentEntry, EnvironmentGroup, Topic,
};
pub use context::ActionContext;
pub use error::DomainError;
pub use options::{CommonOptions, Kwargs, ModuleOptions, PlaybookOptions};
pub use plan::{EnvironmentPath, PlanVariables};
