// TripleO Actions Infrastructure - OpenStack Adapters
// Implements: ObjectStore (Swift), WorkflowClient (Mistral)

pub mod endpoint;
pub mod error;
pub mod mistral;
pub mod swift;

pub use endpoint::Endpoint;
pub use error::{OpenStackError, Result};
pub use mistral::MistralClient;
pub use swift::SwiftClient;
