//! Commit-time rules for split drafts

use std::collections::HashSet;

use chrono::{Days, NaiveDate};

use crate::domain::entities::{Allocation, SplitDraft};
use crate::domain::error::ValidationError;

/// Policy knobs applied when a draft is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPolicy {
    /// How far back a start date may go; `None` disables the check
    pub backdate_window_days: Option<u32>,
    pub allow_duplicate_emails: bool,
    /// Member cap from the subscription tier; `None` is unlimited
    pub max_members: Option<usize>,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            backdate_window_days: Some(45),
            allow_duplicate_emails: false,
            max_members: None,
        }
    }
}

/// Creator plus members must account for exactly 100%.
pub fn validate_allocation(allocation: &impl Allocation) -> Result<(), ValidationError> {
    let total = allocation.total_percentage();
    if total != 100 {
        return Err(ValidationError::AllocationMismatch { total });
    }
    Ok(())
}

/// Full check run before a new split is committed.
pub fn validate_draft(
    draft: &SplitDraft,
    policy: &SplitPolicy,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    validate_allocation(draft)?;

    if let Some(max) = policy.max_members {
        if draft.members.len() > max {
            return Err(ValidationError::TooManyMembers {
                count: draft.members.len(),
                max,
            });
        }
    }

    if !policy.allow_duplicate_emails {
        let mut seen = HashSet::new();
        for member in &draft.members {
            let email = member.email.trim().to_lowercase();
            if email.is_empty() {
                continue;
            }
            if !seen.insert(email) {
                return Err(ValidationError::DuplicateMemberEmail(
                    member.email.trim().to_string(),
                ));
            }
        }
    }

    if let Some(window) = policy.backdate_window_days {
        if let Some(earliest) = earliest_start_date(today, window) {
            if draft.start_date < earliest {
                return Err(ValidationError::StartDateTooEarly {
                    start_date: draft.start_date,
                    earliest,
                });
            }
        }
    }

    Ok(())
}

/// Oldest start date accepted `window_days` before `today`.
pub fn earliest_start_date(today: NaiveDate, window_days: u32) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(u64::from(window_days)))
}
