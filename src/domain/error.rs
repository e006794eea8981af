//! Domain-level errors (no external dependencies)

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::entities::{MemberId, SplitId};

/// Reasons a draft cannot be committed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("split name is required")]
    EmptyName,

    #[error("split must add up to 100% (currently {total}%)")]
    AllocationMismatch { total: u32 },

    #[error("start date {start_date} is before {earliest}, the earliest allowed backdate")]
    StartDateTooEarly {
        start_date: NaiveDate,
        earliest: NaiveDate,
    },

    #[error("member email listed more than once: {0}")]
    DuplicateMemberEmail(String),

    #[error("too many members: {count} (plan allows {max})")]
    TooManyMembers { count: usize, max: usize },
}

/// Domain errors represent business rule violations and stale references.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("split not found: {0}")]
    SplitNotFound(SplitId),

    #[error("member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("no split is being edited")]
    NoEditInProgress,

    #[error("the new split form is not open")]
    FormClosed,
}

impl DomainError {
    /// Stale-reference errors leave state untouched and are reported as notices,
    /// not failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::SplitNotFound(_) | DomainError::MemberNotFound(_)
        )
    }
}
