//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, ValidationError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },
}

impl From<ValidationError> for ApplicationError {
    fn from(e: ValidationError) -> Self {
        ApplicationError::Domain(DomainError::Validation(e))
    }
}

impl ApplicationError {
    /// The validation failure behind this error, if any.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ApplicationError::Domain(DomainError::Validation(v)) => Some(v),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
