//! Create-split form session
//!
//! Stages a new split until it is submitted. Partial input never reaches
//! the split model, and closing the form resets it to its default shape.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::application::services::SplitService;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    Allocation, DomainError, MemberId, Percentage, Split, SplitDraft, SplitMember,
};
use crate::infrastructure::traits::{Clock, IdGenerator};

/// Draft staging for the "New Split" form.
pub struct SplitForm {
    settings: Arc<Settings>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    open: bool,
    draft: SplitDraft,
}

impl SplitForm {
    pub fn new(settings: Arc<Settings>, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        let draft = SplitDraft::new(clock.today(), settings.default_creator_percentage());
        Self {
            settings,
            clock,
            ids,
            open: false,
            draft,
        }
    }

    pub fn draft(&self) -> &SplitDraft {
        &self.draft
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the form and discard everything typed into it.
    pub fn close(&mut self) {
        self.open = false;
        self.reset();
    }

    /// Empty name, no members, default creator share, today's date.
    pub fn reset(&mut self) {
        self.draft = SplitDraft::new(
            self.clock.today(),
            self.settings.default_creator_percentage(),
        );
    }

    /// Draft values are only reachable while the form is open.
    fn draft_mut(&mut self) -> Result<&mut SplitDraft, DomainError> {
        if self.open {
            Ok(&mut self.draft)
        } else {
            Err(DomainError::FormClosed)
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ApplicationResult<()> {
        self.draft_mut()?.name = name.into();
        Ok(())
    }

    pub fn set_start_date(&mut self, date: NaiveDate) -> ApplicationResult<()> {
        self.draft_mut()?.start_date = date;
        Ok(())
    }

    pub fn set_creator_percentage(&mut self, raw: &str) -> ApplicationResult<Percentage> {
        let percentage = Percentage::from_input(raw);
        self.draft_mut()?.creator_percentage = percentage;
        Ok(percentage)
    }

    /// Append a blank member row at 0%. Other shares are left alone.
    pub fn add_member(&mut self) -> ApplicationResult<MemberId> {
        let ids = Arc::clone(&self.ids);
        let draft = self.draft_mut()?;
        let id = ids.next_member_id();
        draft.members.push(SplitMember::new(id.clone()));
        debug!("add_member: {} ({} rows)", id, draft.members.len());
        Ok(id)
    }

    /// Remove a member row. Other shares are left alone.
    pub fn remove_member(&mut self, id: &MemberId) -> ApplicationResult<SplitMember> {
        let draft = self.draft_mut()?;
        let index = draft
            .members
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| DomainError::MemberNotFound(id.clone()))?;
        Ok(draft.members.remove(index))
    }

    pub fn update_member_email(&mut self, id: &MemberId, email: &str) -> ApplicationResult<()> {
        self.draft_mut()?.member_mut(id)?.email = email.to_string();
        Ok(())
    }

    pub fn update_member_name(&mut self, id: &MemberId, name: &str) -> ApplicationResult<()> {
        let name = name.trim();
        self.draft_mut()?.member_mut(id)?.name = (!name.is_empty()).then(|| name.to_string());
        Ok(())
    }

    pub fn update_member_percentage(
        &mut self,
        id: &MemberId,
        raw: &str,
    ) -> ApplicationResult<Percentage> {
        let percentage = Percentage::from_input(raw);
        self.draft_mut()?.member_mut(id)?.percentage = percentage;
        Ok(percentage)
    }

    pub fn total_percentage(&self) -> u32 {
        self.draft.total_percentage()
    }

    /// The guard behind the submit button: named and fully allocated.
    pub fn is_submittable(&self) -> bool {
        !self.draft.name.trim().is_empty() && self.draft.is_fully_allocated()
    }

    /// Inline feedback for the current draft, if any.
    pub fn validation_message(&self) -> Option<String> {
        let total = self.total_percentage();
        if total != 100 {
            Some(format!("Split must add up to 100% (currently {total}%)"))
        } else if self.draft.name.trim().is_empty() {
            Some("Split name is required".to_string())
        } else {
            None
        }
    }

    /// Commit the draft into `splits`, resetting the form on success.
    ///
    /// On failure the draft is kept so the user can fix it. A closed form
    /// has nothing to submit.
    pub fn submit(&mut self, splits: &mut SplitService) -> ApplicationResult<Split> {
        let draft = self.draft_mut()?;
        let split = splits.create_split(draft)?;
        self.close();
        Ok(split)
    }
}
