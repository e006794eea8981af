//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (Clock, IdGenerator)
//! but are themselves concrete structs, not traits.

mod form;
mod splits;

pub use form::SplitForm;
pub use splits::{SplitService, SplitSummary};
