//! Interaction controller.
//!
//! Turns user events (form input, tab clicks, inline edits, delete requests,
//! filter keystrokes) into store operations and keeps the rendered tables,
//! the active screen and the status notice in step with the store.

mod navigation;
mod status;

use std::time::{Duration, Instant};

pub use navigation::{NavState, Navigation, Screen};
pub use status::{Severity, StatusMessage, StatusNotice};

use crate::error::Result;
use crate::model::Registration;
use crate::render::{render_leaderboard, render_participants, RowAction, Table, TableKind};
use crate::score::ScoreField;
use crate::storage::RecordStore;
use crate::store::Scoreboard;

/// Default lifetime of a status message.
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_millis(5000);

/// A field of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Team name.
    TeamName,
    /// Captain name.
    CaptainName,
    /// Contact email.
    Email,
    /// Contact phone.
    Phone,
    /// Comma-separated members.
    Members,
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A tab was clicked.
    SelectTab(Screen),
    /// A navigation link was clicked; `None` for links that are not screen links.
    SelectLink(Option<Screen>),
    /// A registration form field was edited.
    EditForm(FormField, String),
    /// The registration form was submitted.
    Submit,
    /// An inline score cell was changed.
    EditScore {
        /// Result the cell belongs to.
        result_id: String,
        /// Field the cell edits.
        field: ScoreField,
        /// Raw cell content.
        value: String,
    },
    /// A row's delete button was pressed. Needs confirmation.
    RequestAction(RowAction),
    /// The pending action was confirmed.
    Confirm,
    /// The pending action was declined.
    Cancel,
    /// The filter box of a table changed.
    Filter(TableKind, String),
}

/// Question to ask before running `action`.
#[must_use]
pub fn confirmation_prompt(action: &RowAction) -> &'static str {
    match action {
        RowAction::DeleteParticipant(_) => "Are you sure you want to delete this participant?",
        RowAction::DeleteResult(_) => "Are you sure you want to delete this result?",
    }
}

/// Drives a [`Scoreboard`] from user events.
#[derive(Debug)]
pub struct Controller<S> {
    board: Scoreboard<S>,
    navigation: Navigation,
    status: StatusNotice,
    form: Registration,
    pending: Option<RowAction>,
    participants: Table,
    leaderboard: Table,
    participants_query: String,
    leaderboard_query: String,
}

impl<S: RecordStore> Controller<S> {
    /// Wrap a loaded scoreboard and render both tables.
    pub fn new(board: Scoreboard<S>, screen: Screen, status_timeout: Duration) -> Self {
        let participants = render_participants(board.participants());
        let leaderboard = render_leaderboard(board.results());

        Self {
            board,
            navigation: Navigation::new(screen),
            status: StatusNotice::new(status_timeout),
            form: Registration::default(),
            pending: None,
            participants,
            leaderboard,
            participants_query: String::new(),
            leaderboard_query: String::new(),
        }
    }

    /// Handle one event at time `now`.
    ///
    /// User mistakes (duplicate team names, stale identifiers, bad numbers)
    /// never fail; they show a status message or do nothing.
    ///
    /// # Errors
    ///
    /// Returns an error only if the record store fails.
    pub fn handle(&mut self, event: Event, now: Instant) -> Result<()> {
        match event {
            Event::SelectTab(screen) => self.navigation.select_tab(screen),
            Event::SelectLink(target) => {
                self.navigation.select_link(target);
            }
            Event::EditForm(field, value) => *self.form_field_mut(field) = value,
            Event::Submit => self.submit(now)?,
            Event::EditScore {
                result_id,
                field,
                value,
            } => self.edit_score(&result_id, field, &value, now)?,
            Event::RequestAction(action) => {
                tracing::debug!(?action, "awaiting confirmation");
                self.pending = Some(action);
            }
            Event::Confirm => self.confirm(now)?,
            Event::Cancel => {
                if let Some(action) = self.pending.take() {
                    tracing::debug!(?action, "action declined");
                }
            }
            Event::Filter(kind, query) => self.filter(kind, query),
        }
        Ok(())
    }

    /// Advance the status notice clock. Returns whether the message was hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.status.tick(now)
    }

    /// The underlying store.
    pub fn board(&self) -> &Scoreboard<S> {
        &self.board
    }

    /// Screen selection.
    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    /// Status notice.
    pub fn status(&self) -> &StatusNotice {
        &self.status
    }

    /// Current registration form contents.
    pub fn form(&self) -> &Registration {
        &self.form
    }

    /// Action waiting for confirmation.
    pub fn pending(&self) -> Option<&RowAction> {
        self.pending.as_ref()
    }

    /// Most recently rendered table of `kind`.
    pub fn table(&self, kind: TableKind) -> &Table {
        match kind {
            TableKind::Participants => &self.participants,
            TableKind::Leaderboard => &self.leaderboard,
        }
    }

    /// Table shown on the active screen.
    pub fn active_table(&self) -> &Table {
        self.table(table_for(self.navigation.active()))
    }

    /// Last filter text typed for `kind`.
    pub fn filter_query(&self, kind: TableKind) -> &str {
        match kind {
            TableKind::Participants => &self.participants_query,
            TableKind::Leaderboard => &self.leaderboard_query,
        }
    }

    fn form_field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::TeamName => &mut self.form.team_name,
            FormField::CaptainName => &mut self.form.captain_name,
            FormField::Email => &mut self.form.email,
            FormField::Phone => &mut self.form.phone,
            FormField::Members => &mut self.form.members,
        }
    }

    fn submit(&mut self, now: Instant) -> Result<()> {
        let team_name = self.form.team_name.clone();

        match self.board.register(self.form.clone()) {
            Ok(_) => {
                self.form = Registration::default();
                self.render_all();
                self.status.show(
                    format!("Team \"{team_name}\" registered successfully!"),
                    Severity::Success,
                    now,
                );
                self.navigation.select_tab(Screen::Participants);
                Ok(())
            }
            Err(e) if e.is_user_error() => {
                self.status.show(e.to_string(), Severity::Error, now);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn edit_score(
        &mut self,
        result_id: &str,
        field: ScoreField,
        value: &str,
        now: Instant,
    ) -> Result<()> {
        if self.board.update_score(result_id, field, value)?.is_some() {
            self.leaderboard = render_leaderboard(self.board.results());
            self.status
                .show("Score updated successfully!", Severity::Success, now);
        }
        Ok(())
    }

    fn confirm(&mut self, now: Instant) -> Result<()> {
        let Some(action) = self.pending.take() else {
            return Ok(());
        };

        match action {
            RowAction::DeleteParticipant(id) => {
                if self.board.delete_participant(&id)? {
                    self.render_all();
                    self.status
                        .show("Participant deleted successfully!", Severity::Success, now);
                }
            }
            RowAction::DeleteResult(id) => {
                if self.board.delete_result(&id)? {
                    self.leaderboard = render_leaderboard(self.board.results());
                    self.status
                        .show("Result deleted successfully!", Severity::Success, now);
                }
            }
        }
        Ok(())
    }

    fn filter(&mut self, kind: TableKind, query: String) {
        match kind {
            TableKind::Participants => {
                self.participants.apply_filter(&query);
                self.participants_query = query;
            }
            TableKind::Leaderboard => {
                self.leaderboard.apply_filter(&query);
                self.leaderboard_query = query;
            }
        }
    }

    fn render_all(&mut self) {
        self.participants = render_participants(self.board.participants());
        self.leaderboard = render_leaderboard(self.board.results());
    }
}

/// Table displayed on `screen`.
#[must_use]
pub fn table_for(screen: Screen) -> TableKind {
    match screen {
        Screen::Participants => TableKind::Participants,
        Screen::Leaderboard => TableKind::Leaderboard,
    }
}
