//! Core record types for ctfboard.
//!
//! A [`Participant`] is created once per registered team. Registration also
//! produces a [`TeamResult`] sharing the participant's identifier; after that
//! the two records evolve independently.

use serde::{Deserialize, Serialize};

use crate::score::{deserialize_score, total_score, ScoreField};

/// Uptime label given to freshly registered teams.
pub const DEFAULT_UPTIME: &str = "0%";

fn default_uptime() -> String {
    DEFAULT_UPTIME.to_string()
}

/// Raw registration form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    /// Team name. Must be unique among registered participants.
    pub team_name: String,
    /// Captain name.
    pub captain_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Comma-separated member names.
    pub members: String,
}

/// Split a comma-separated member list into trimmed names.
///
/// Empty input yields a single empty name, matching how the list has always
/// been stored.
#[must_use]
pub fn split_members(raw: &str) -> Vec<String> {
    raw.split(',').map(|m| m.trim().to_string()).collect()
}

/// A registered team and its contact details.
///
/// The score fields are the zeroed snapshot taken at registration; they are
/// persisted so the participant record keeps its historical shape, but live
/// scores are tracked on [`TeamResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Time-derived unique identifier.
    pub id: String,
    /// Team name.
    pub team_name: String,
    /// Captain name.
    #[serde(default)]
    pub captain_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Team members in entry order.
    #[serde(default)]
    pub members: Vec<String>,
    /// Defence score at registration.
    #[serde(default, deserialize_with = "deserialize_score")]
    pub defence_score: i64,
    /// Attack score at registration.
    #[serde(default, deserialize_with = "deserialize_score")]
    pub attack_score: i64,
    /// Uptime at registration.
    #[serde(default = "default_uptime")]
    pub uptime: String,
    /// Total score at registration.
    #[serde(default, deserialize_with = "deserialize_score")]
    pub total_score: i64,
}

impl Participant {
    /// Build a participant from raw form input.
    #[must_use]
    pub fn new(id: String, registration: Registration) -> Self {
        let Registration {
            team_name,
            captain_name,
            email,
            phone,
            members,
        } = registration;

        Self {
            id,
            team_name,
            captain_name,
            email,
            phone,
            members: split_members(&members),
            defence_score: 0,
            attack_score: 0,
            uptime: default_uptime(),
            total_score: 0,
        }
    }

    /// Members joined for display.
    #[must_use]
    pub fn members_display(&self) -> String {
        self.members.join(", ")
    }

    /// The scoring record created alongside this participant.
    #[must_use]
    pub fn initial_result(&self) -> TeamResult {
        TeamResult {
            id: self.id.clone(),
            team_name: self.team_name.clone(),
            defence_score: 0,
            attack_score: 0,
            uptime: default_uptime(),
            total_score: 0,
        }
    }
}

/// The scoring record of one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResult {
    /// Identifier shared with the originating participant.
    pub id: String,
    /// Team name, copied at registration.
    pub team_name: String,
    /// Defence score.
    #[serde(default, deserialize_with = "deserialize_score")]
    pub defence_score: i64,
    /// Attack score.
    #[serde(default, deserialize_with = "deserialize_score")]
    pub attack_score: i64,
    /// Free-text uptime label, e.g. `"97%"`.
    #[serde(default = "default_uptime")]
    pub uptime: String,
    /// Always `defence_score + attack_score` after a score edit.
    #[serde(default, deserialize_with = "deserialize_score")]
    pub total_score: i64,
}

impl TeamResult {
    /// Apply an already parsed edit to this result.
    ///
    /// Numeric edits recompute the total; uptime edits leave it untouched.
    pub fn apply(&mut self, edit: ScoreEdit) {
        let field = edit.field();
        match edit {
            ScoreEdit::Defence(value) => self.defence_score = value,
            ScoreEdit::Attack(value) => self.attack_score = value,
            ScoreEdit::Uptime(value) => self.uptime = value,
        }
        if field.affects_total() {
            self.total_score = total_score(self.defence_score, self.attack_score);
        }
    }
}

/// A parsed edit of one result field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreEdit {
    /// New defence score.
    Defence(i64),
    /// New attack score.
    Attack(i64),
    /// New uptime label.
    Uptime(String),
}

impl ScoreEdit {
    /// Parse raw cell input for `field`.
    ///
    /// Numeric fields never fail: unparseable input becomes 0.
    #[must_use]
    pub fn parse(field: ScoreField, raw: &str) -> Self {
        match field {
            ScoreField::Defence => Self::Defence(crate::score::parse_score(raw)),
            ScoreField::Attack => Self::Attack(crate::score::parse_score(raw)),
            ScoreField::Uptime => Self::Uptime(raw.to_string()),
        }
    }

    /// The field this edit targets.
    #[must_use]
    pub fn field(&self) -> ScoreField {
        match self {
            Self::Defence(_) => ScoreField::Defence,
            Self::Attack(_) => ScoreField::Attack,
            Self::Uptime(_) => ScoreField::Uptime,
        }
    }
}
