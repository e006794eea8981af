//! Interactive session: the presentation layer over the split model
//!
//! Executes [`SessionCommand`]s against one explicitly constructed
//! split model and create form, rendering results to the terminal.

use std::io::BufRead;

use itertools::Itertools;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::{SplitForm, SplitService};
use crate::application::{ApplicationError, ApplicationResult};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::script::{parse_line, SessionCommand};
use crate::domain::{format_cents, Allocation, DomainError, Payee, ShareTarget, Split, SplitId};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Counters reported when a script finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub executed: usize,
    pub failed: usize,
    /// Lines naming an unknown split or member; reported, state untouched
    pub skipped: usize,
}

/// One user's in-memory session.
pub struct Session {
    splits: SplitService,
    form: SplitForm,
}

impl Session {
    pub fn new(container: &ServiceContainer) -> Self {
        Self {
            splits: container.split_service(),
            form: container.split_form(),
        }
    }

    pub fn splits(&self) -> &SplitService {
        &self.splits
    }

    pub fn form(&self) -> &SplitForm {
        &self.form
    }

    /// Run every line from `input`.
    ///
    /// Failed lines are reported and the run moves on; with `strict` the first failure
    /// aborts the run with its line number. Unknown split or member ids are
    /// only a notice and never abort the run.
    pub fn run(&mut self, input: impl BufRead, strict: bool) -> CliResult<RunReport> {
        let mut report = RunReport::default();
        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|e| InfraError::io(format!("read line {line_no}"), e))?;

            let message = match parse_line(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => match self.execute(&command) {
                    Ok(()) => {
                        report.executed += 1;
                        continue;
                    }
                    Err(ApplicationError::Domain(e)) if e.is_not_found() => {
                        report.skipped += 1;
                        output::warning(&format!("line {line_no}: {e}, nothing changed"));
                        continue;
                    }
                    Err(e) => e.to_string(),
                },
                Err(message) => message,
            };

            let err = CliError::Script {
                line: line_no,
                message,
            };
            if strict {
                return Err(err);
            }
            report.failed += 1;
            output::error(&err);
        }
        debug!("run: {:?}", report);
        Ok(report)
    }

    /// Apply one action and render its result.
    #[instrument(skip(self))]
    pub fn execute(&mut self, command: &SessionCommand) -> ApplicationResult<()> {
        match command {
            SessionCommand::New => {
                self.form.open();
                output::action("New split", "form opened");
            }
            SessionCommand::Close => {
                self.form.close();
                output::action("New split", "form closed, draft discarded");
            }
            SessionCommand::Name(name) => self.form.set_name(name.as_str())?,
            SessionCommand::Date(date) => self.form.set_start_date(*date)?,
            SessionCommand::Creator(raw) => {
                let pct = self.form.set_creator_percentage(raw)?;
                output::detail(&format!("creator: {pct}"));
            }
            SessionCommand::Add => {
                let id = self.form.add_member()?;
                output::action("Added member", &id);
            }
            SessionCommand::Remove(id) => {
                let removed = self.form.remove_member(id)?;
                output::action("Removed member", &removed.id);
            }
            SessionCommand::Email(id, email) => self.form.update_member_email(id, email)?,
            SessionCommand::MemberName(id, name) => self.form.update_member_name(id, name)?,
            SessionCommand::Pct(id, raw) => {
                let pct = self.form.update_member_percentage(id, raw)?;
                output::detail(&format!("{id}: {pct}"));
            }
            SessionCommand::Total => {
                output::info(&format!("Total: {}%", self.form.total_percentage()));
                if let Some(message) = self.form.validation_message() {
                    output::warning(&message);
                }
            }
            SessionCommand::Submit => {
                let split = self.form.submit(&mut self.splits)?;
                output::success(&format!("Created split {} '{}'", split.id, split.name));
            }
            SessionCommand::List => self.render_list(),
            SessionCommand::Show(id) => {
                let split = self.find(id)?;
                output::info(&render_split(split));
            }
            SessionCommand::Toggle(id) => {
                let status = self.splits.toggle_status(id)?;
                output::action("Status", &format!("{id} is now {status}"));
            }
            SessionCommand::Edit(id) => {
                let draft = self.splits.open_for_edit(id)?;
                output::action(
                    "Editing",
                    &format!("{} ({}%)", draft.split_id, draft.total_percentage()),
                );
            }
            SessionCommand::EditCreator(raw) => {
                let pct = self.splits.set_edit_creator_percentage(raw)?;
                self.report_edit_total(format!("creator: {pct}"));
            }
            SessionCommand::EditPct(id, raw) => {
                let pct = self
                    .splits
                    .update_edit_percentage(&ShareTarget::Member(id.clone()), raw)?;
                self.report_edit_total(format!("{id}: {pct}"));
            }
            SessionCommand::Save => {
                let split = self.splits.save_edit_changes()?;
                output::success(&format!("Saved split {}", split.id));
            }
            SessionCommand::Cancel => {
                if self.splits.cancel_edit() {
                    output::action("Edit", "changes discarded");
                } else {
                    output::warning("no edit in progress");
                }
            }
            SessionCommand::Stats => {
                let s = self.splits.summary();
                output::header("Splits");
                output::detail(&format!("Active splits:   {}", s.active));
                output::detail(&format!("Inactive splits: {}", s.inactive));
                output::detail(&format!("Team members:    {}", s.members));
            }
            SessionCommand::Payout(id, cents) => {
                let split = self.find(id)?;
                let payout = self.splits.payout(id, *cents)?;
                output::header(&format!("Payout of {} from {}", format_cents(*cents), split.name));
                for line in &payout.lines {
                    let who = match &line.payee {
                        Payee::Creator => split.creator_name.clone(),
                        Payee::Member(member_id) => split
                            .members
                            .iter()
                            .find(|m| &m.id == member_id)
                            .map(|m| m.display_name().to_string())
                            .unwrap_or_else(|| member_id.to_string()),
                    };
                    output::detail(&format!(
                        "{who} ({}): {}",
                        line.percentage,
                        format_cents(line.amount_cents)
                    ));
                }
            }
        }
        Ok(())
    }

    fn find(&self, id: &SplitId) -> ApplicationResult<&Split> {
        self.splits
            .get(id)
            .ok_or_else(|| ApplicationError::from(DomainError::SplitNotFound(id.clone())))
    }

    fn report_edit_total(&self, change: String) {
        output::detail(&change);
        if let Some(total) = self.splits.edit_total() {
            output::info(&format!("Total: {total}%"));
            if total != 100 {
                output::warning(&format!("split must add up to 100% (currently {total}%)"));
            }
        }
    }

    fn render_list(&self) {
        let splits = self.splits.splits();
        if splits.is_empty() {
            output::info("No splits yet");
            return;
        }
        output::header("All Splits");
        for split in splits {
            let members = split
                .members
                .iter()
                .map(|m| format!("{} {}", m.display_name(), m.percentage))
                .join(", ");
            output::info(&format!(
                "{}  {}  [{}]  started {}  {} members  {} {}{}{}",
                split.id,
                split.name,
                split.status,
                split.start_date,
                split.participant_count(),
                split.creator_name,
                split.creator_percentage,
                if members.is_empty() { "" } else { ", " },
                members
            ));
        }
    }
}

/// Detail view of one split as a tree.
pub fn render_split(split: &Split) -> Tree<String> {
    let mut tree = Tree::new(format!(
        "{} '{}' [{}] started {}",
        split.id, split.name, split.status, split.start_date
    ));
    tree.push(Tree::new(format!(
        "{} (creator) {}",
        split.creator_name, split.creator_percentage
    )));
    for member in &split.members {
        let label = match member.display_initial() {
            Some(initial) => format!("[{initial}] {} {}", member.display_name(), member.percentage),
            None => format!("[?] {} {}", member.id, member.percentage),
        };
        tree.push(Tree::new(label));
    }
    tree.push(Tree::new(format!("total {}%", split.total_percentage())));
    tree
}
