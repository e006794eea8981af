//! Domain layer: split entities and allocation rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod payout;
pub mod percentage;
pub mod validation;

pub use entities::*;
pub use error::{DomainError, ValidationError};
pub use payout::{distribute, format_cents, Payee, Payout, PayoutLine};
pub use percentage::Percentage;
pub use validation::{earliest_start_date, validate_allocation, validate_draft, SplitPolicy};
