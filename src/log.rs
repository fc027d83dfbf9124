//! Event recording
//!
//! Append-only log of symptom taps. The log is the single writer of events;
//! the aggregation engine only ever sees an immutable snapshot taken at call
//! entry, so a report pass is unaffected by concurrent recording.
//!
//! Persistence is expressed as a JSON round-trip; where the snapshot is
//! stored is the embedding application's concern.

use crate::types::{SymptomEvent, SymptomState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only symptom event log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    entries: Vec<SymptomEvent>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tap at the current instant
    pub fn record(&mut self, state: SymptomState) -> &SymptomEvent {
        self.record_at(state, Utc::now())
    }

    /// Record a tap at an explicit instant
    pub fn record_at(&mut self, state: SymptomState, timestamp: DateTime<Utc>) -> &SymptomEvent {
        self.entries.push(SymptomEvent::new(state, timestamp));
        // Just pushed, so the last entry exists
        &self.entries[self.entries.len() - 1]
    }

    /// All recorded events, in recording order
    pub fn entries(&self) -> &[SymptomEvent] {
        &self.entries
    }

    /// Owned copy of the log for an aggregation pass, detached from
    /// subsequent recording
    pub fn snapshot(&self) -> Vec<SymptomEvent> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear the entire log in one step. The only deletion the log supports.
    pub fn reset_all(&mut self) {
        self.entries.clear();
    }

    /// Load a log from its JSON snapshot
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the log to its JSON snapshot
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_appends_in_order() {
        let mut log = EventLog::new();
        let first = Utc.with_ymd_and_hms(2024, 6, 1, 9, 15, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 6, 1, 9, 40, 0).unwrap();

        log.record_at(SymptomState::On, first);
        log.record_at(SymptomState::Tremor, second);

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].state, SymptomState::On);
        assert_eq!(log.entries()[1].state, SymptomState::Tremor);
        assert_eq!(log.entries()[1].timestamp, second);
        // Every event gets its own identifier
        assert_ne!(log.entries()[0].id, log.entries()[1].id);
    }

    #[test]
    fn test_snapshot_is_detached_from_later_recording() {
        let mut log = EventLog::new();
        log.record_at(
            SymptomState::Off,
            Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap(),
        );

        let snapshot = log.snapshot();
        log.record_at(
            SymptomState::On,
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
        );

        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_reset_all_clears_everything() {
        let mut log = EventLog::new();
        log.record_at(
            SymptomState::On,
            Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap(),
        );
        log.record_at(
            SymptomState::Dyskinesia,
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
        );
        assert!(!log.is_empty());

        log.reset_all();
        assert!(log.is_empty());
        assert_eq!(log.entries(), &[]);
    }

    #[test]
    fn test_json_round_trip() {
        let mut log = EventLog::new();
        log.record_at(
            SymptomState::Tremor,
            Utc.with_ymd_and_hms(2024, 6, 1, 22, 30, 0).unwrap(),
        );

        let json = log.to_json().unwrap();
        let restored = EventLog::from_json(&json).unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.entries()[0], log.entries()[0]);

        // The snapshot is a plain JSON array of events
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["state"], "trem");
    }
}
