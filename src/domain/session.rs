use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FieldId, FieldSchedule};

/// Where a session stands in the intake flow. Selection precedes the
/// field schedule; a completed session is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Waiting for the investigator to be chosen from the roster card.
    Selecting,
    /// Walking the field schedule, collecting voice notes.
    Collecting,
}

/// Per-user progress record through the field schedule.
///
/// Invariant: while `phase == Collecting`, the number of schedule-field
/// entries in `values` equals `position`; every field before `position`
/// has a finalized value and none beyond it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub phase: SessionPhase,
    /// Index of the next schedule field to collect.
    pub position: usize,
    /// Finalized (rewritten) text per field id, plus the reserved
    /// investigator entry once the selection is recorded.
    pub values: BTreeMap<FieldId, String>,
    /// Idempotency marker: id of the last successfully handled event.
    pub last_handled_event_id: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Selecting,
            position: 0,
            values: BTreeMap::new(),
            last_handled_event_id: None,
            started_at: Utc::now(),
        }
    }

    /// True when the given event id was already processed for this session.
    pub fn already_handled(&self, event_id: &str) -> bool {
        self.last_handled_event_id.as_deref() == Some(event_id)
    }

    pub fn record_selection(&mut self, investigator: String) {
        self.values.insert(FieldId::investigator(), investigator);
        self.phase = SessionPhase::Collecting;
    }

    pub fn record_field(&mut self, id: FieldId, text: String) {
        self.values.insert(id, text);
        self.position += 1;
    }

    pub fn investigator(&self) -> Option<&str> {
        self.values
            .get(&FieldId::investigator())
            .map(String::as_str)
    }

    /// Number of schedule fields collected so far (reserved investigator
    /// entry excluded).
    pub fn collected_len(&self) -> usize {
        self.values
            .keys()
            .filter(|id| **id != FieldId::investigator())
            .count()
    }

    pub fn is_complete(&self, schedule: &FieldSchedule) -> bool {
        self.phase == SessionPhase::Collecting && self.position >= schedule.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
