//! `ctfboard` - a local scoreboard for capture-the-flag competitions
//!
//! Registers teams, tracks their defence and attack scores and uptime, and
//! keeps everything in a local record store. The library is usable without
//! any front end: [`Scoreboard`] holds the data, [`render`] and [`filter`]
//! build the two tables, and [`Controller`] turns user events into changes.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod logging;
pub mod model;
pub mod render;
pub mod score;
pub mod session;
pub mod storage;
pub mod store;

pub use config::Config;
pub use controller::{Controller, Event, Screen};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Participant, Registration, TeamResult};
pub use score::ScoreField;
pub use storage::{MemoryStore, RecordStore, Records, SqliteStore};
pub use store::Scoreboard;
