//! Domain entities: splits, members and their drafts

use std::fmt;

use chrono::NaiveDate;

use crate::domain::error::DomainError;
use crate::domain::percentage::Percentage;

/// Identifier of a committed split.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SplitId(String);

/// Identifier of a split member, unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(SplitId);
string_id!(MemberId);

/// Whether a split currently distributes revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SplitStatus {
    #[default]
    Active,
    Inactive,
}

impl SplitStatus {
    pub fn toggled(self) -> Self {
        match self {
            SplitStatus::Active => SplitStatus::Inactive,
            SplitStatus::Inactive => SplitStatus::Active,
        }
    }

    pub fn is_active(self) -> bool {
        self == SplitStatus::Active
    }
}

impl fmt::Display for SplitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitStatus::Active => f.write_str("active"),
            SplitStatus::Inactive => f.write_str("inactive"),
        }
    }
}

/// Participant holding a share of a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMember {
    pub id: MemberId,
    /// Invitation address, free-form
    pub email: String,
    pub name: Option<String>,
    pub percentage: Percentage,
}

impl SplitMember {
    /// Blank member row: no email, 0%.
    pub fn new(id: MemberId) -> Self {
        Self {
            id,
            email: String::new(),
            name: None,
            percentage: Percentage::ZERO,
        }
    }

    /// Name if set, otherwise the email.
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }

    /// Avatar initial: first character of the name, falling back to the email.
    pub fn display_initial(&self) -> Option<char> {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
    }
}

/// Who a percentage edit applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareTarget {
    Creator,
    Member(MemberId),
}

/// Anything carrying a creator share plus member shares.
///
/// The total is always derived from the current shares, never stored.
pub trait Allocation {
    fn creator_percentage(&self) -> Percentage;

    fn members(&self) -> &[SplitMember];

    fn total_percentage(&self) -> u32 {
        u32::from(self.creator_percentage())
            + self
                .members()
                .iter()
                .map(|m| u32::from(m.percentage))
                .sum::<u32>()
    }

    fn is_fully_allocated(&self) -> bool {
        self.total_percentage() == 100
    }
}

/// Committed revenue split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub id: SplitId,
    pub name: String,
    pub start_date: NaiveDate,
    pub status: SplitStatus,
    pub creator_id: String,
    pub creator_name: String,
    pub creator_percentage: Percentage,
    pub members: Vec<SplitMember>,
}

impl Allocation for Split {
    fn creator_percentage(&self) -> Percentage {
        self.creator_percentage
    }

    fn members(&self) -> &[SplitMember] {
        &self.members
    }
}

impl Split {
    /// Participants including the creator.
    pub fn participant_count(&self) -> usize {
        self.members.len() + 1
    }
}

/// Uncommitted values of the create-split form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDraft {
    pub name: String,
    pub start_date: NaiveDate,
    pub creator_percentage: Percentage,
    pub members: Vec<SplitMember>,
}

impl SplitDraft {
    pub fn new(start_date: NaiveDate, creator_percentage: Percentage) -> Self {
        Self {
            name: String::new(),
            start_date,
            creator_percentage,
            members: Vec::new(),
        }
    }

    pub fn member_mut(&mut self, id: &MemberId) -> Result<&mut SplitMember, DomainError> {
        find_member_mut(&mut self.members, id)
    }
}

impl Allocation for SplitDraft {
    fn creator_percentage(&self) -> Percentage {
        self.creator_percentage
    }

    fn members(&self) -> &[SplitMember] {
        &self.members
    }
}

/// Shares of a committed split forked for in-place editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub split_id: SplitId,
    pub creator_percentage: Percentage,
    pub members: Vec<SplitMember>,
}

impl EditDraft {
    /// Fork the editable parts of `split`.
    pub fn fork(split: &Split) -> Self {
        Self {
            split_id: split.id.clone(),
            creator_percentage: split.creator_percentage,
            members: split.members.clone(),
        }
    }

    /// Set the share of `target`.
    pub fn set_share(
        &mut self,
        target: &ShareTarget,
        percentage: Percentage,
    ) -> Result<(), DomainError> {
        match target {
            ShareTarget::Creator => self.creator_percentage = percentage,
            ShareTarget::Member(id) => {
                find_member_mut(&mut self.members, id)?.percentage = percentage
            }
        }
        Ok(())
    }
}

impl Allocation for EditDraft {
    fn creator_percentage(&self) -> Percentage {
        self.creator_percentage
    }

    fn members(&self) -> &[SplitMember] {
        &self.members
    }
}

fn find_member_mut<'a>(
    members: &'a mut [SplitMember],
    id: &MemberId,
) -> Result<&'a mut SplitMember, DomainError> {
    members
        .iter_mut()
        .find(|m| &m.id == id)
        .ok_or_else(|| DomainError::MemberNotFound(id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, pct: u64) -> SplitMember {
        SplitMember {
            percentage: Percentage::new(pct),
            ..SplitMember::new(MemberId::from(id))
        }
    }

    fn split() -> Split {
        Split {
            id: SplitId::from("s1"),
            name: "Ad Revenue".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            status: SplitStatus::Active,
            creator_id: "1".to_string(),
            creator_name: "John Doe".to_string(),
            creator_percentage: Percentage::new(50),
            members: vec![member("m1", 30), member("m2", 20)],
        }
    }

    #[test]
    fn given_status_when_toggled_twice_then_returns_to_original() {
        assert_eq!(SplitStatus::Active.toggled(), SplitStatus::Inactive);
        assert_eq!(SplitStatus::Active.toggled().toggled(), SplitStatus::Active);
    }

    #[test]
    fn given_split_when_summing_then_includes_creator_and_members() {
        let s = split();
        assert_eq!(s.total_percentage(), 100);
        assert!(s.is_fully_allocated());
        assert_eq!(s.participant_count(), 3);
    }

    #[test]
    fn given_member_without_name_when_display_initial_then_uses_email() {
        let mut m = member("m1", 0);
        m.email = "alice@example.com".to_string();
        assert_eq!(m.display_initial(), Some('A'));

        m.name = Some("bob".to_string());
        assert_eq!(m.display_initial(), Some('B'));
        assert_eq!(m.display_name(), "bob");
    }

    #[test]
    fn given_blank_member_when_display_initial_then_none() {
        assert_eq!(member("m1", 0).display_initial(), None);
    }

    #[test]
    fn given_edit_draft_when_setting_share_then_split_is_untouched() {
        let s = split();
        let mut draft = EditDraft::fork(&s);

        draft
            .set_share(&ShareTarget::Member(MemberId::from("m1")), Percentage::new(10))
            .unwrap();
        draft
            .set_share(&ShareTarget::Creator, Percentage::new(5))
            .unwrap();

        assert_eq!(draft.total_percentage(), 35);
        assert_eq!(s, split());
    }

    #[test]
    fn given_unknown_member_when_setting_share_then_member_not_found() {
        let mut draft = EditDraft::fork(&split());
        let err = draft
            .set_share(&ShareTarget::Member(MemberId::from("nope")), Percentage::ZERO)
            .unwrap_err();
        assert!(matches!(err, DomainError::MemberNotFound(id) if id.as_str() == "nope"));
    }
}
