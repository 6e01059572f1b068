//! Score calculation and score input parsing.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Leading integer of a score cell: optional whitespace, optional sign, digits.
static LEADING_INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?\d+)").expect("leading integer pattern is valid")
});

/// An editable field of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    /// Points for keeping own services defended.
    Defence,
    /// Points for attacking other teams.
    Attack,
    /// Free-text service availability label.
    Uptime,
}

impl ScoreField {
    /// All editable fields in column order.
    pub const ALL: [ScoreField; 3] = [Self::Defence, Self::Attack, Self::Uptime];

    /// Whether edits to this field change the total score.
    #[must_use]
    pub fn affects_total(self) -> bool {
        matches!(self, Self::Defence | Self::Attack)
    }

    /// Key of this field in persisted records.
    #[must_use]
    pub fn record_key(self) -> &'static str {
        match self {
            Self::Defence => "defenceScore",
            Self::Attack => "attackScore",
            Self::Uptime => "uptime",
        }
    }
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defence => write!(f, "defence"),
            Self::Attack => write!(f, "attack"),
            Self::Uptime => write!(f, "uptime"),
        }
    }
}

impl FromStr for ScoreField {
    type Err = Error;

    /// Accepts the short names and the persisted record keys, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| {
                s.eq_ignore_ascii_case(&field.to_string())
                    || s.eq_ignore_ascii_case(field.record_key())
            })
            .ok_or_else(|| Error::UnknownScoreField(s.to_string()))
    }
}

/// Parse a raw score cell.
///
/// Reads the leading integer and ignores anything after it, so `"12 pts"` is
/// 12 and `"3.9"` is 3. Input with no leading integer, or one that does not
/// fit in an `i64`, scores 0.
#[must_use]
pub fn parse_score(raw: &str) -> i64 {
    LEADING_INTEGER
        .captures(raw)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// Deserialize a stored score leniently.
///
/// Integers that fit in an `i64` load as-is and numeric strings go through
/// [`parse_score`]. Anything else (`null`, fractions, integers out of range)
/// loads as 0 instead of failing the whole record.
///
/// # Errors
///
/// Returns an error only if the input is not valid JSON.
pub fn deserialize_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(serde_json::Value::String(s)) => parse_score(&s),
        _ => 0,
    })
}

/// Total score of a result.
#[must_use]
pub fn total_score(defence: i64, attack: i64) -> i64 {
    defence.saturating_add(attack)
}
