//! Split allocation model
//!
//! Owns the authoritative, insertion-ordered collection of splits and the
//! single in-place edit session. Every commit re-checks the 100% rule.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    distribute, validate_allocation, validate_draft, Allocation, DomainError, EditDraft, Payout,
    Percentage, ShareTarget, Split, SplitDraft, SplitId, SplitStatus,
};
use crate::infrastructure::traits::{Clock, IdGenerator};

/// Aggregates shown above the split list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitSummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Members across all splits, creators excluded
    pub members: usize,
}

/// Service owning committed splits and the edit session.
pub struct SplitService {
    settings: Arc<Settings>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    splits: Vec<Split>,
    edit: Option<EditDraft>,
}

impl SplitService {
    /// Create an empty split model.
    pub fn new(settings: Arc<Settings>, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            settings,
            clock,
            ids,
            splits: Vec::new(),
            edit: None,
        }
    }

    /// Committed splits in creation order.
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    pub fn get(&self, id: &SplitId) -> Option<&Split> {
        self.splits.iter().find(|s| &s.id == id)
    }

    fn index_of(&self, id: &SplitId) -> Result<usize, DomainError> {
        self.splits
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| DomainError::SplitNotFound(id.clone()))
    }

    /// Validate `draft` and append it as a new active split.
    ///
    /// The collection is unchanged when validation fails.
    pub fn create_split(&mut self, draft: &SplitDraft) -> ApplicationResult<Split> {
        let today = self.clock.today();
        validate_draft(draft, &self.settings.policy(), today)?;

        let split = Split {
            id: self.ids.next_split_id(),
            name: draft.name.trim().to_string(),
            start_date: draft.start_date,
            status: SplitStatus::Active,
            creator_id: self.settings.creator.id.clone(),
            creator_name: self.settings.creator.name.clone(),
            creator_percentage: draft.creator_percentage,
            members: draft.members.clone(),
        };
        info!(
            "created split {} '{}' with {} member(s)",
            split.id,
            split.name,
            split.members.len()
        );

        self.splits.push(split.clone());
        Ok(split)
    }

    /// Flip active ⇄ inactive, returning the new status.
    ///
    /// An unknown id is reported as `SplitNotFound` and changes nothing.
    pub fn toggle_status(&mut self, id: &SplitId) -> ApplicationResult<SplitStatus> {
        let index = self.index_of(id)?;
        let split = &mut self.splits[index];
        split.status = split.status.toggled();
        debug!("toggle_status: {} -> {}", split.id, split.status);
        Ok(split.status)
    }

    /// Fork the split's shares into an edit draft.
    ///
    /// A draft already open for another split is discarded.
    pub fn open_for_edit(&mut self, id: &SplitId) -> ApplicationResult<&EditDraft> {
        let index = self.index_of(id)?;
        if let Some(previous) = &self.edit {
            debug!("open_for_edit: discarding draft for {}", previous.split_id);
        }
        let draft = EditDraft::fork(&self.splits[index]);
        Ok(&*self.edit.insert(draft))
    }

    pub fn edit_draft(&self) -> Option<&EditDraft> {
        self.edit.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Set one share of the edit draft from raw input.
    pub fn update_edit_percentage(
        &mut self,
        target: &ShareTarget,
        raw: &str,
    ) -> ApplicationResult<Percentage> {
        let draft = self.edit.as_mut().ok_or(DomainError::NoEditInProgress)?;
        let percentage = Percentage::from_input(raw);
        draft.set_share(target, percentage)?;
        debug!("update_edit_percentage: {:?} = {}", target, percentage);
        Ok(percentage)
    }

    pub fn set_edit_creator_percentage(&mut self, raw: &str) -> ApplicationResult<Percentage> {
        self.update_edit_percentage(&ShareTarget::Creator, raw)
    }

    /// Live total of the edit draft, `None` outside an edit session.
    pub fn edit_total(&self) -> Option<u32> {
        self.edit.as_ref().map(|d| d.total_percentage())
    }

    /// Commit the edit draft onto its split and close the session.
    ///
    /// An unbalanced draft is rejected and stays open for further edits.
    pub fn save_edit_changes(&mut self) -> ApplicationResult<&Split> {
        let draft = self.edit.as_ref().ok_or(DomainError::NoEditInProgress)?;
        validate_allocation(draft)?;
        let index = self.index_of(&draft.split_id)?;

        if let Some(draft) = self.edit.take() {
            let split = &mut self.splits[index];
            split.creator_percentage = draft.creator_percentage;
            split.members = draft.members;
            info!("saved split {} allocation", split.id);
        }
        Ok(&self.splits[index])
    }

    /// Drop the edit draft. Returns whether one was open.
    pub fn cancel_edit(&mut self) -> bool {
        let discarded = self.edit.take();
        if let Some(draft) = &discarded {
            debug!("cancel_edit: discarded draft for {}", draft.split_id);
        }
        discarded.is_some()
    }

    pub fn summary(&self) -> SplitSummary {
        let active = self.splits.iter().filter(|s| s.status.is_active()).count();
        SplitSummary {
            total: self.splits.len(),
            active,
            inactive: self.splits.len() - active,
            members: self.splits.iter().map(|s| s.members.len()).sum(),
        }
    }

    /// Preview how `amount_cents` would be paid out by a split.
    pub fn payout(&self, id: &SplitId, amount_cents: u64) -> ApplicationResult<Payout> {
        let split = self
            .get(id)
            .ok_or_else(|| DomainError::SplitNotFound(id.clone()))?;
        Ok(distribute(amount_cents, split)?)
    }
}
