//! Table rendering for the participants list and the leaderboard.
//!
//! Rendering always builds a fresh [`Table`] from the current collections.
//! Rows carry the actions bound to them so a front end can wire edits and
//! deletes without knowing about the store.

use std::fmt;

use serde::Serialize;

use crate::model::{Participant, TeamResult};
use crate::score::ScoreField;

/// Placeholder text of an empty participants table.
pub const NO_PARTICIPANTS: &str = "No participants registered yet.";

/// Placeholder text of an empty leaderboard.
pub const NO_RESULTS: &str = "No results available yet.";

const PARTICIPANT_HEADERS: &[&str] = &["Team", "Captain", "Email", "Phone", "Members", "ID"];
const LEADERBOARD_HEADERS: &[&str] = &["Team", "Defence", "Attack", "Uptime", "Total", "ID"];

/// Which table a [`Table`] shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Registered teams.
    Participants,
    /// Results ordered by total score.
    Leaderboard,
}

/// Where an inline edit of a cell goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditBinding {
    /// Result to update.
    pub result_id: String,
    /// Field to update.
    pub field: ScoreField,
}

/// Action offered by a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum RowAction {
    /// Delete the participant (and its result).
    DeleteParticipant(String),
    /// Delete only the result.
    DeleteResult(String),
}

impl RowAction {
    /// Identifier the action is bound to.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::DeleteParticipant(id) | Self::DeleteResult(id) => id,
        }
    }
}

/// One displayed cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Displayed value.
    pub value: String,
    /// Set for inline-editable cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit: Option<EditBinding>,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            edit: None,
        }
    }

    fn editable(value: impl Into<String>, result_id: &str, field: ScoreField) -> Self {
        Self {
            value: value.into(),
            edit: Some(EditBinding {
                result_id: result_id.to_string(),
                field,
            }),
        }
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Displayed cells, in column order, excluding the action column.
    pub cells: Vec<Cell>,
    /// Row action; `None` for the placeholder row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<RowAction>,
    /// Hidden by the current filter.
    #[serde(skip)]
    pub hidden: bool,
}

impl Row {
    fn placeholder(text: &str) -> Self {
        Self {
            cells: vec![Cell::text(text)],
            action: None,
            hidden: false,
        }
    }

    /// Whether this is the "no data" row of an empty table.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.action.is_none()
    }

    /// Full visible text of the row: all cell values separated by spaces.
    #[must_use]
    pub fn text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A rendered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Which table this is.
    pub kind: TableKind,
    /// Column headers.
    pub headers: &'static [&'static str],
    /// Rows in display order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Rows not hidden by the current filter.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| !r.hidden)
    }

    /// Records behind the visible rows, in row order.
    ///
    /// `id_of` gives the identifier a record's row action is bound to.
    #[must_use]
    pub fn visible_records<'a, T>(
        &self,
        records: &'a [T],
        id_of: impl Fn(&T) -> &str,
    ) -> Vec<&'a T> {
        self.visible_rows()
            .filter_map(|row| row.action.as_ref())
            .filter_map(|action| records.iter().find(|r| id_of(r) == action.id()))
            .collect()
    }

    /// Whether the table only holds its placeholder row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Row::is_placeholder)
    }
}

/// Render participants in registration order.
#[must_use]
pub fn render_participants(list: &[Participant]) -> Table {
    let rows = if list.is_empty() {
        vec![Row::placeholder(NO_PARTICIPANTS)]
    } else {
        list.iter()
            .map(|p| Row {
                cells: vec![
                    Cell::text(&p.team_name),
                    Cell::text(&p.captain_name),
                    Cell::text(&p.email),
                    Cell::text(&p.phone),
                    Cell::text(p.members_display()),
                ],
                action: Some(RowAction::DeleteParticipant(p.id.clone())),
                hidden: false,
            })
            .collect()
    };

    Table {
        kind: TableKind::Participants,
        headers: PARTICIPANT_HEADERS,
        rows,
    }
}

/// Render results by total score, highest first.
///
/// Equal totals keep their collection order.
#[must_use]
pub fn render_leaderboard(list: &[TeamResult]) -> Table {
    let rows = if list.is_empty() {
        vec![Row::placeholder(NO_RESULTS)]
    } else {
        let mut sorted: Vec<&TeamResult> = list.iter().collect();
        sorted.sort_by(|a, b| b.total_score.cmp(&a.total_score));

        sorted
            .into_iter()
            .map(|r| Row {
                cells: vec![
                    Cell::text(&r.team_name),
                    Cell::editable(r.defence_score.to_string(), &r.id, ScoreField::Defence),
                    Cell::editable(r.attack_score.to_string(), &r.id, ScoreField::Attack),
                    Cell::editable(&r.uptime, &r.id, ScoreField::Uptime),
                    Cell::text(r.total_score.to_string()),
                ],
                action: Some(RowAction::DeleteResult(r.id.clone())),
                hidden: false,
            })
            .collect()
    };

    Table {
        kind: TableKind::Leaderboard,
        headers: LEADERBOARD_HEADERS,
        rows,
    }
}

impl fmt::Display for Table {
    /// Plain text with aligned columns. Hidden rows are left out and the
    /// action column shows the identifier the row's action is bound to.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<Vec<&str>> = self
            .visible_rows()
            .filter(|r| !r.is_placeholder())
            .map(|r| {
                r.cells
                    .iter()
                    .map(|c| c.value.as_str())
                    .chain(r.action.as_ref().map(RowAction::id))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for line in &lines {
            for (width, value) in widths.iter_mut().zip(line) {
                *width = (*width).max(value.chars().count());
            }
        }

        write_line(f, self.headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, &rule, &widths)?;

        for line in &lines {
            write_line(f, line, &widths)?;
        }

        // Placeholder spans the whole table
        for row in self.visible_rows().filter(|r| r.is_placeholder()) {
            writeln!(f, "{}", row.text())?;
        }
        Ok(())
    }
}

fn write_line<S: AsRef<str>>(
    f: &mut fmt::Formatter<'_>,
    values: &[S],
    widths: &[usize],
) -> fmt::Result {
    let padded: Vec<String> = values
        .iter()
        .zip(widths)
        .map(|(v, w)| {
            let v = v.as_ref();
            let pad = w.saturating_sub(v.chars().count());
            format!("{v}{}", " ".repeat(pad))
        })
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}
