// TripleO Actions Core - Domain Logic & Ports
// NO adapter dependencies: processes and HTTP are reached through ports

pub mod application;
pub mod constants;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
