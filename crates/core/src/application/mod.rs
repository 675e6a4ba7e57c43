// Application Layer - Use Cases

pub mod ansible;
pub mod plan;
pub mod registry;

// Re-exports
pub use ansible::{AnsibleBinaries, AnsibleOutput, AnsibleService};
pub use plan::PlanService;
pub use registry::{ActionName, ActionRegistry};
