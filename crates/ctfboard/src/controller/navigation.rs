//! Screen selection shared by the tab bar and the navigation links.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the two mutually exclusive screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Registration form and participants table.
    #[default]
    Participants,
    /// Leaderboard with inline score editing.
    Leaderboard,
}

impl Screen {
    /// Both screens in tab order.
    pub const ALL: [Screen; 2] = [Self::Participants, Self::Leaderboard];
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Participants => write!(f, "participants"),
            Self::Leaderboard => write!(f, "leaderboard"),
        }
    }
}

impl FromStr for Screen {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|screen| s.eq_ignore_ascii_case(&screen.to_string()))
            .ok_or_else(|| Error::UnknownScreen(s.to_string()))
    }
}

/// Active-state flags of one navigation element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavState {
    /// Screen the element points at.
    pub screen: Screen,
    /// Whether it is marked active.
    pub active: bool,
}

/// Which screen is shown.
///
/// Tabs and navigation links are both derived from the single active screen,
/// so they can never disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation {
    active: Screen,
}

impl Navigation {
    /// Start on `screen`.
    #[must_use]
    pub fn new(screen: Screen) -> Self {
        Self { active: screen }
    }

    /// The active screen.
    #[must_use]
    pub fn active(&self) -> Screen {
        self.active
    }

    /// Whether `screen` is active.
    #[must_use]
    pub fn is_active(&self, screen: Screen) -> bool {
        self.active == screen
    }

    /// Activate `screen` from its tab.
    pub fn select_tab(&mut self, screen: Screen) {
        if self.active != screen {
            tracing::debug!(from = %self.active, to = %screen, "screen switched");
        }
        self.active = screen;
    }

    /// Activate the screen a navigation link points at.
    ///
    /// Links without a target screen are ordinary links and change nothing.
    /// Returns whether the link was handled.
    pub fn select_link(&mut self, target: Option<Screen>) -> bool {
        match target {
            Some(screen) => {
                self.select_tab(screen);
                true
            }
            None => false,
        }
    }

    /// State of each tab, in tab order.
    #[must_use]
    pub fn tabs(&self) -> [NavState; 2] {
        Screen::ALL.map(|screen| NavState {
            screen,
            active: self.is_active(screen),
        })
    }

    /// State of each navigation link, mirroring the tabs.
    #[must_use]
    pub fn links(&self) -> [NavState; 2] {
        self.tabs()
    }
}
