//! Infrastructure layer: boundary implementations and DI container
//!
//! This layer implements the boundary traits and wires up services.

pub mod di;
pub mod error;
pub mod traits;

pub use error::{InfraError, InfraResult};
