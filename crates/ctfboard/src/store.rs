//! The scoreboard domain store.
//!
//! [`Scoreboard`] owns the participant and result collections and writes
//! them through to a [`Records`] adapter after every change.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{Participant, Registration, ScoreEdit, TeamResult};
use crate::score::ScoreField;
use crate::storage::{RecordStore, Records};

/// In-memory scoreboard state with write-through persistence.
#[derive(Debug)]
pub struct Scoreboard<S> {
    records: Records<S>,
    participants: Vec<Participant>,
    results: Vec<TeamResult>,
    /// Last identifier handed out, used to keep identifiers increasing.
    last_id: i64,
}

impl<S: RecordStore> Scoreboard<S> {
    /// Load both collections from `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store cannot be read. Missing or
    /// corrupt records are not errors.
    pub fn load(records: Records<S>) -> Result<Self> {
        let participants = records.load_participants()?;
        let results = records.load_results()?;

        let last_id = participants
            .iter()
            .map(|p| p.id.as_str())
            .chain(results.iter().map(|r| r.id.as_str()))
            .filter_map(|id| id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        info!(
            participants = participants.len(),
            results = results.len(),
            "scoreboard loaded"
        );

        Ok(Self {
            records,
            participants,
            results,
            last_id,
        })
    }

    /// Registered participants in registration order.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Results in collection order.
    #[must_use]
    pub fn results(&self) -> &[TeamResult] {
        &self.results
    }

    /// Find a participant by identifier.
    #[must_use]
    pub fn find_participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Find a result by identifier.
    #[must_use]
    pub fn find_result(&self, id: &str) -> Option<&TeamResult> {
        self.results.iter().find(|r| r.id == id)
    }

    /// The persistence adapter.
    pub fn records(&self) -> &Records<S> {
        &self.records
    }

    /// Register a team and create its zeroed result.
    ///
    /// Returns the new identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateTeam`] if a participant with exactly the same
    /// team name exists; nothing changes in that case. Storage failures are
    /// returned after rolling the in-memory collections back.
    pub fn register(&mut self, registration: Registration) -> Result<String> {
        if self
            .participants
            .iter()
            .any(|p| p.team_name == registration.team_name)
        {
            debug!(team = %registration.team_name, "duplicate registration rejected");
            return Err(Error::duplicate_team(registration.team_name));
        }

        let id = self.next_id();
        let participant = Participant::new(id.clone(), registration);
        let result = participant.initial_result();
        let team = participant.team_name.clone();

        self.participants.push(participant);
        self.results.push(result);

        if let Err(e) = self.persist_all() {
            self.participants.pop();
            self.results.pop();
            return Err(e);
        }

        info!(%id, %team, "team registered");
        Ok(id)
    }

    /// Set one field of a result from raw input.
    ///
    /// Numeric fields coerce unparseable input to 0 and recompute the total.
    /// Returns the updated result, or `None` (without writing anything) when
    /// no result has this identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the result list cannot be persisted.
    pub fn update_score(
        &mut self,
        result_id: &str,
        field: ScoreField,
        raw_value: &str,
    ) -> Result<Option<&TeamResult>> {
        let Some(index) = self.results.iter().position(|r| r.id == result_id) else {
            debug!(%result_id, %field, "score update for unknown result ignored");
            return Ok(None);
        };

        self.results[index].apply(ScoreEdit::parse(field, raw_value));
        self.records.save_results(&self.results)?;

        let result = &self.results[index];
        info!(
            %result_id,
            %field,
            total = result.total_score,
            "score updated"
        );
        Ok(Some(result))
    }

    /// Delete a participant and the result sharing its identifier.
    ///
    /// Returns `false`, without writing anything, if neither exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the collections cannot be persisted.
    pub fn delete_participant(&mut self, id: &str) -> Result<bool> {
        let before = (self.participants.len(), self.results.len());
        self.participants.retain(|p| p.id != id);
        self.results.retain(|r| r.id != id);

        if (self.participants.len(), self.results.len()) == before {
            debug!(%id, "delete of unknown participant ignored");
            return Ok(false);
        }

        self.persist_all()?;
        info!(%id, "participant deleted");
        Ok(true)
    }

    /// Delete only the result with this identifier.
    ///
    /// Returns `false`, without writing anything, if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the result list cannot be persisted.
    pub fn delete_result(&mut self, id: &str) -> Result<bool> {
        let before = self.results.len();
        self.results.retain(|r| r.id != id);

        if self.results.len() == before {
            debug!(%id, "delete of unknown result ignored");
            return Ok(false);
        }

        self.records.save_results(&self.results)?;
        info!(%id, "result deleted");
        Ok(true)
    }

    fn persist_all(&mut self) -> Result<()> {
        self.records.save_participants(&self.participants)?;
        self.records.save_results(&self.results)
    }

    /// Millisecond timestamp, bumped past the previous identifier if needed.
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id.saturating_add(1));
        self.last_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_PARTICIPANTS_KEY, DEFAULT_RESULTS_KEY};
    use crate::storage::MemoryStore;

    fn empty_board() -> Scoreboard<MemoryStore> {
        Scoreboard::load(Records::new(MemoryStore::new())).unwrap()
    }

    fn form(team: &str) -> Registration {
        Registration {
            team_name: team.to_string(),
            captain_name: format!("{team} captain"),
            email: format!("{}@example.org", team.to_lowercase()),
            phone: "555-0100".to_string(),
            members: "a, b ,c".to_string(),
        }
    }

    fn persisted(board: &Scoreboard<MemoryStore>) -> (Option<String>, Option<String>) {
        let store = board.records().store();
        (
            store.read(DEFAULT_PARTICIPANTS_KEY).unwrap(),
            store.read(DEFAULT_RESULTS_KEY).unwrap(),
        )
    }

    #[test]
    fn test_register_creates_participant_and_result() {
        let mut board = empty_board();
        let id = board.register(form("Alpha")).unwrap();

        let p = board.find_participant(&id).unwrap();
        assert_eq!(p.team_name, "Alpha");
        assert_eq!(p.members, vec!["a", "b", "c"]);

        let r = board.find_result(&id).unwrap();
        assert_eq!(r.team_name, "Alpha");
        assert_eq!(r.total_score, 0);
        assert_eq!(r.uptime, "0%");
    }

    #[test]
    fn test_register_persists_both_collections() {
        let mut board = empty_board();
        board.register(form("Alpha")).unwrap();

        let (participants, results) = persisted(&board);
        assert!(participants.unwrap().contains("\"teamName\":\"Alpha\""));
        assert!(results.unwrap().contains("\"totalScore\":0"));
    }

    #[test]
    fn test_register_duplicate_is_rejected() {
        let mut board = empty_board();
        board.register(form("Alpha")).unwrap();
        let before = persisted(&board);

        let err = board.register(form("Alpha")).unwrap_err();
        assert!(matches!(err, Error::DuplicateTeam { .. }));
        assert_eq!(board.participants().len(), 1);
        assert_eq!(board.results().len(), 1);
        assert_eq!(persisted(&board), before);
    }

    #[test]
    fn test_register_duplicate_is_case_sensitive() {
        let mut board = empty_board();
        board.register(form("Alpha")).unwrap();

        assert!(board.register(form("alpha")).is_ok());
        assert_eq!(board.participants().len(), 2);
    }

    #[test]
    fn test_register_ids_are_unique_and_increasing() {
        let mut board = empty_board();
        let ids: Vec<i64> = (0..20)
            .map(|i| board.register(form(&format!("T{i}"))).unwrap().parse().unwrap())
            .collect();

        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ids_continue_after_loaded_records() {
        let mut store = MemoryStore::new();
        let future = Utc::now().timestamp_millis() + 1_000_000;
        store
            .write(
                DEFAULT_PARTICIPANTS_KEY,
                &format!(r#"[{{"id":"{future}","teamName":"Old"}}]"#),
            )
            .unwrap();

        let mut board = Scoreboard::load(Records::new(store)).unwrap();
        let id: i64 = board.register(form("New")).unwrap().parse().unwrap();
        assert_eq!(id, future + 1);
    }

    #[test]
    fn test_update_defence_and_attack_recompute_total() {
        let mut board = empty_board();
        let id = board.register(form("Alpha")).unwrap();

        board.update_score(&id, ScoreField::Defence, "10").unwrap();
        let r = board.update_score(&id, ScoreField::Attack, "32").unwrap().unwrap();
        assert_eq!(r.total_score, 42);
        assert_eq!(r.total_score, r.defence_score + r.attack_score);
    }

    #[test]
    fn test_update_malformed_score_is_zero() {
        let mut board = empty_board();
        let id = board.register(form("Alpha")).unwrap();
        board.update_score(&id, ScoreField::Attack, "15").unwrap();

        let r = board.update_score(&id, ScoreField::Attack, "lots").unwrap().unwrap();
        assert_eq!(r.attack_score, 0);
        assert_eq!(r.total_score, 0);
    }

    #[test]
    fn test_update_uptime_only_changes_uptime() {
        let mut board = empty_board();
        let id = board.register(form("Alpha")).unwrap();
        board.update_score(&id, ScoreField::Defence, "5").unwrap();
        let before = board.find_result(&id).unwrap().clone();

        board.update_score(&id, ScoreField::Uptime, "50%").unwrap();
        let after = board.find_result(&id).unwrap();
        assert_eq!(after.uptime, "50%");
        assert_eq!(after.total_score, before.total_score);
        assert_eq!(after.defence_score, before.defence_score);
        assert_eq!(after.attack_score, before.attack_score);
    }

    #[test]
    fn test_update_score_persists() {
        let mut board = empty_board();
        let id = board.register(form("Alpha")).unwrap();
        board.update_score(&id, ScoreField::Defence, "7").unwrap();

        let reloaded = Records::new(board.records().store().clone());
        assert_eq!(reloaded.load_results().unwrap()[0].total_score, 7);
    }

    #[test]
    fn test_update_unknown_result_is_noop() {
        let mut board = empty_board();
        board.register(form("Alpha")).unwrap();
        let before = persisted(&board);

        assert!(board
            .update_score("missing", ScoreField::Defence, "10")
            .unwrap()
            .is_none());
        assert_eq!(persisted(&board), before);
    }

    #[test]
    fn test_update_does_not_touch_participant() {
        let mut board = empty_board();
        let id = board.register(form("Alpha")).unwrap();
        board.update_score(&id, ScoreField::Attack, "9").unwrap();

        assert_eq!(board.find_participant(&id).unwrap().attack_score, 0);
    }

    #[test]
    fn test_delete_participant_cascades() {
        let mut board = empty_board();
        let a = board.register(form("Alpha")).unwrap();
        let b = board.register(form("Beta")).unwrap();

        assert!(board.delete_participant(&a).unwrap());
        assert!(board.find_participant(&a).is_none());
        assert!(board.find_result(&a).is_none());
        assert!(board.find_participant(&b).is_some());
        assert!(board.find_result(&b).is_some());
    }

    #[test]
    fn test_delete_result_keeps_participant() {
        let mut board = empty_board();
        let a = board.register(form("Alpha")).unwrap();

        assert!(board.delete_result(&a).unwrap());
        assert!(board.find_result(&a).is_none());
        assert!(board.find_participant(&a).is_some());

        // Participant delete still works with the result already gone
        assert!(board.delete_participant(&a).unwrap());
        assert!(board.participants().is_empty());
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let mut board = empty_board();
        board.register(form("Alpha")).unwrap();
        let before = persisted(&board);
        let participants = board.participants().to_vec();
        let results = board.results().to_vec();

        assert!(!board.delete_participant("nope").unwrap());
        assert!(!board.delete_result("nope").unwrap());
        assert_eq!(board.participants(), participants.as_slice());
        assert_eq!(board.results(), results.as_slice());
        assert_eq!(persisted(&board), before);
    }

    #[test]
    fn test_delete_on_empty_board_writes_nothing() {
        let mut board = empty_board();
        assert!(!board.delete_participant("1").unwrap());
        assert!(board.records().store().is_empty());
    }

    #[test]
    fn test_reload_reproduces_state() {
        let mut board = empty_board();
        let a = board.register(form("Alpha")).unwrap();
        board.register(form("Beta")).unwrap();
        board.update_score(&a, ScoreField::Defence, "12").unwrap();

        let store = board.records().store().clone();
        let reloaded = Scoreboard::load(Records::new(store)).unwrap();
        assert_eq!(reloaded.participants(), board.participants());
        assert_eq!(reloaded.results(), board.results());
    }
}
