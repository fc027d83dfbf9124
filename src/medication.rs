//! Medication list
//!
//! Display-only collaborator: holds the named medications and their
//! wall-clock intake schedules for the report's medication section and for
//! reminder-style consumers. Never feeds aggregation arithmetic.

use crate::types::Medication;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owned list of scheduled medications
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicationList {
    medications: Vec<Medication>,
}

impl MedicationList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a medication
    pub fn add(&mut self, medication: Medication) {
        self.medications.push(medication);
    }

    /// Remove a medication by identifier. Returns whether one was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.medications.len();
        self.medications.retain(|medication| medication.id != id);
        self.medications.len() < before
    }

    /// All medications, in insertion order
    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn len(&self) -> usize {
        self.medications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medications.is_empty()
    }

    /// Earliest scheduled intake strictly after the given wall-clock time,
    /// across all medications; wraps to the day's first intake when nothing
    /// later remains today. None when no medication has a schedule.
    pub fn next_dose_after(&self, after: NaiveTime) -> Option<(&Medication, NaiveTime)> {
        let mut later_today: Option<(&Medication, NaiveTime)> = None;
        let mut first_of_day: Option<(&Medication, NaiveTime)> = None;

        for medication in &self.medications {
            for &time in &medication.scheduled_times {
                if time > after && later_today.map_or(true, |(_, best)| time < best) {
                    later_today = Some((medication, time));
                }
                if first_of_day.map_or(true, |(_, best)| time < best) {
                    first_of_day = Some((medication, time));
                }
            }
        }

        later_today.or(first_of_day)
    }

    /// Load a list from its JSON snapshot
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the list to its JSON snapshot
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn sample_list() -> MedicationList {
        let mut list = MedicationList::new();
        list.add(Medication::new(
            "Levodopa",
            1.5,
            vec![time(8, 0), time(14, 0), time(20, 0)],
        ));
        list.add(Medication::new("Rasagiline", 1.0, vec![time(9, 30)]));
        list
    }

    #[test]
    fn test_add_and_remove() {
        let mut list = sample_list();
        assert_eq!(list.len(), 2);

        let id = list.medications()[0].id;
        assert!(list.remove(id));
        assert_eq!(list.len(), 1);
        assert_eq!(list.medications()[0].name, "Rasagiline");

        // Removing an unknown id is a no-op
        assert!(!list.remove(Uuid::new_v4()));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_next_dose_within_the_day() {
        let list = sample_list();

        let (medication, at) = list.next_dose_after(time(8, 30)).unwrap();
        assert_eq!(medication.name, "Rasagiline");
        assert_eq!(at, time(9, 30));

        let (medication, at) = list.next_dose_after(time(15, 0)).unwrap();
        assert_eq!(medication.name, "Levodopa");
        assert_eq!(at, time(20, 0));
    }

    #[test]
    fn test_next_dose_wraps_past_last_intake() {
        let list = sample_list();

        let (medication, at) = list.next_dose_after(time(21, 0)).unwrap();
        assert_eq!(medication.name, "Levodopa");
        assert_eq!(at, time(8, 0));
    }

    #[test]
    fn test_next_dose_is_strictly_after() {
        let list = sample_list();

        // A dose exactly at the query time is not "next"
        let (_, at) = list.next_dose_after(time(8, 0)).unwrap();
        assert_eq!(at, time(9, 30));
    }

    #[test]
    fn test_next_dose_on_empty_list() {
        let list = MedicationList::new();
        assert!(list.next_dose_after(time(12, 0)).is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let list = sample_list();
        let json = list.to_json().unwrap();
        let restored = MedicationList::from_json(&json).unwrap();

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.medications()[0], list.medications()[0]);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["name"], "Levodopa");
        assert_eq!(value[1]["scheduled_times"][0], "09:30:00");
    }
}
