//! Core types for the Motor Diary pipeline
//!
//! This module defines the data that flows through each stage of the pipeline:
//! raw symptom events, the trailing window, fixed half-hour slots, per-slot
//! statistics, the derived daily summary, and the display-only medication and
//! subject records.

use crate::error::DiaryError;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Default trailing window length in days
pub const DEFAULT_WINDOW_DAYS: i64 = 28;

/// Number of half-hour slots in one day
pub const SLOTS_PER_DAY: usize = 48;

/// Clinical symptom state recorded by a single tap
///
/// The state set is fixed domain knowledge; no open extensibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymptomState {
    /// Medication effective, symptoms controlled
    #[serde(rename = "on")]
    On,
    /// Medication worn off, symptoms uncontrolled
    #[serde(rename = "off")]
    Off,
    /// Involuntary movement episode
    #[serde(rename = "dys", alias = "dyskinesia")]
    Dyskinesia,
    /// Tremor episode
    #[serde(rename = "trem", alias = "tremor")]
    Tremor,
}

impl SymptomState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymptomState::On => "on",
            SymptomState::Off => "off",
            SymptomState::Dyskinesia => "dys",
            SymptomState::Tremor => "trem",
        }
    }
}

impl FromStr for SymptomState {
    type Err = DiaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(SymptomState::On),
            "off" => Ok(SymptomState::Off),
            "dys" | "dyskinesia" => Ok(SymptomState::Dyskinesia),
            "trem" | "tremor" => Ok(SymptomState::Tremor),
            other => Err(DiaryError::UnknownState(other.to_string())),
        }
    }
}

/// A single recorded symptom tap
///
/// Created exactly once when the user taps a state button; never mutated.
/// Deleted only by the log's bulk reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomEvent {
    /// Unique event identifier
    pub id: Uuid,
    /// Instant the tap was recorded (UTC)
    pub timestamp: DateTime<Utc>,
    /// Recorded state
    pub state: SymptomState,
}

impl SymptomEvent {
    /// Create a new event with a fresh identifier
    pub fn new(state: SymptomState, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            state,
        }
    }
}

/// One of the 48 fixed half-hour buckets of a day
///
/// Slots are a fixed enumeration independent of calendar date and of the
/// event data; every day has exactly these 48 slots. A slot is identified by
/// its hour and a flag for the second half (minutes 30-59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    /// Hour of day, 0-23
    pub hour: u8,
    /// false covers minutes 0-29, true covers minutes 30-59
    pub second_half: bool,
}

impl TimeSlot {
    /// All 48 slots in chronological order (00:00, 00:30, ..., 23:30)
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (0u8..24).flat_map(|hour| {
            [
                TimeSlot {
                    hour,
                    second_half: false,
                },
                TimeSlot {
                    hour,
                    second_half: true,
                },
            ]
        })
    }

    /// Parse a "HH:MM" label. Returns None for anything unparseable or out of
    /// range; any in-range minute maps to its containing half.
    pub fn parse(label: &str) -> Option<TimeSlot> {
        let (hour_text, minute_text) = label.split_once(':')?;
        let hour: u8 = hour_text.parse().ok()?;
        let minute: u8 = minute_text.parse().ok()?;
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(TimeSlot {
            hour,
            second_half: minute >= 30,
        })
    }

    /// Render the canonical "HH:00" / "HH:30" label
    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.start_minute())
    }

    /// First minute of the slot (0 or 30)
    pub fn start_minute(&self) -> u8 {
        if self.second_half {
            30
        } else {
            0
        }
    }

    /// Position in the chronological enumeration, 0-47
    pub fn index(&self) -> usize {
        self.hour as usize * 2 + usize::from(self.second_half)
    }

    /// Whether a wall-clock time-of-day falls inside this slot.
    /// Minute 30 exactly belongs to the second half, never the first.
    pub fn contains_wall_clock(&self, hour: u32, minute: u32) -> bool {
        if hour != u32::from(self.hour) {
            return false;
        }
        if self.second_half {
            minute >= 30
        } else {
            minute < 30
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.start_minute())
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        TimeSlot::parse(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid slot label: {label}")))
    }
}

/// A trailing time range used to select events for the current profile
///
/// Both ends are inclusive: an event stamped exactly at `start` or `end`
/// counts. The evaluation instant is captured once per aggregation pass so
/// every slot sees the same window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Oldest included instant (UTC)
    pub start: DateTime<Utc>,
    /// Newest included instant (UTC), the captured "now"
    pub end: DateTime<Utc>,
}

impl Window {
    /// Trailing window of the given length ending at `now`
    pub fn trailing(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }

    /// Trailing window of the default 28 days ending at `now`
    pub fn default_trailing(now: DateTime<Utc>) -> Self {
        Self::trailing(now, DEFAULT_WINDOW_DAYS)
    }

    /// Whether an instant falls inside the window (inclusive on both ends)
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Window length in whole days
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Per-slot statistics derived for one window
///
/// `balance_ratio` is 0.0 exactly when no on/off events fall in the slot;
/// a slot with no data is therefore indistinguishable from a perfectly
/// balanced one. Dyskinesia and tremor events never affect the ratio,
/// only their own counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotStatistics {
    /// Count of `on` events in the slot
    pub on_count: u32,
    /// Count of `off` events in the slot
    pub off_count: u32,
    /// Count of dyskinesia events in the slot
    pub dyskinesia_count: u32,
    /// Count of tremor events in the slot
    pub tremor_count: u32,
    /// (on - off) / (on + off) x 100, in [-100, 100]; 0.0 when on + off == 0
    pub balance_ratio: f64,
}

impl SlotStatistics {
    /// Denominator of the balance ratio
    pub fn total_balance(&self) -> u32 {
        self.on_count + self.off_count
    }
}

/// One slot's entry in the daily profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub slot: TimeSlot,
    pub stats: SlotStatistics,
}

/// The 48-slot daily profile, the shared artifact consumed by every
/// presentation surface
///
/// Always exactly 48 entries in chronological order, empty slots included.
/// Computed once per report pass and never recomputed with different window
/// boundaries within that pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProfile {
    /// Window the statistics were computed over
    pub window: Window,
    /// One entry per slot, 00:00 through 23:30
    pub entries: Vec<ProfileEntry>,
}

impl DailyProfile {
    /// Statistics for a specific slot
    pub fn get(&self, slot: TimeSlot) -> Option<&SlotStatistics> {
        self.entries.get(slot.index()).map(|entry| &entry.stats)
    }

    /// Balance ratio series in slot order
    pub fn balance_series(&self) -> Vec<f64> {
        self.entries
            .iter()
            .map(|entry| entry.stats.balance_ratio)
            .collect()
    }

    /// Dyskinesia count series in slot order
    pub fn dyskinesia_series(&self) -> Vec<u32> {
        self.entries
            .iter()
            .map(|entry| entry.stats.dyskinesia_count)
            .collect()
    }

    /// Tremor count series in slot order
    pub fn tremor_series(&self) -> Vec<u32> {
        self.entries
            .iter()
            .map(|entry| entry.stats.tremor_count)
            .collect()
    }
}

/// Semantic tag attached to a summary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Favorable,
    Unfavorable,
    Neutral,
}

/// Kind of derived insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Slot with the highest positive balance ratio
    BestPeriod,
    /// Slot with the lowest negative balance ratio
    HardestPeriod,
    /// Mean balance ratio over the strictly positive slots
    DailyAverage,
}

/// One derived summary line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    /// Winning slot; absent for the average insight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<TimeSlot>,
    /// Balance ratio backing the insight (signed)
    pub value: f64,
}

impl Insight {
    /// Severity tag for rendering
    pub fn severity(&self) -> Severity {
        match self.kind {
            InsightKind::BestPeriod => Severity::Favorable,
            InsightKind::HardestPeriod => Severity::Unfavorable,
            InsightKind::DailyAverage => Severity::Neutral,
        }
    }

    /// Natural-language headline. Percentages are truncated toward zero and
    /// the slot is rendered at hour granularity.
    pub fn headline(&self) -> String {
        let percent = self.value.abs() as i64;
        match self.kind {
            InsightKind::BestPeriod => {
                let hour = self.slot.map(|slot| slot.hour).unwrap_or(0);
                format!("Best period: {hour}h ({percent}% on)")
            }
            InsightKind::HardestPeriod => {
                let hour = self.slot.map(|slot| slot.hour).unwrap_or(0);
                format!("Hardest period: {hour}h ({percent}% off)")
            }
            InsightKind::DailyAverage => format!("Daily average: {percent}% on"),
        }
    }
}

/// The up-to-three derived insights in fixed order: best, hardest, average
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub insights: Vec<Insight>,
}

impl DailySummary {
    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.insights.len()
    }
}

/// A scheduled medication, joined into reports for display only
///
/// Never feeds aggregation arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    /// Unique medication identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Dose units per intake (positive)
    pub dosage: f64,
    /// Wall-clock intake times, sorted and unique; no date component
    pub scheduled_times: Vec<NaiveTime>,
}

impl Medication {
    /// Create a medication with a fresh identifier. Scheduled times are
    /// sorted and deduplicated.
    pub fn new(name: impl Into<String>, dosage: f64, mut scheduled_times: Vec<NaiveTime>) -> Self {
        scheduled_times.sort();
        scheduled_times.dedup();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            dosage,
            scheduled_times,
        }
    }
}

/// Identifying and clinical metadata used only for report headers
///
/// Opaque to the aggregation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub first_name: String,
    pub last_name: String,
    /// Birth date, if captured; drives the computed age in report headers
    pub birth_date: Option<NaiveDate>,
    /// Year of diagnosis, if captured
    pub diagnosis_year: Option<i32>,
    #[serde(default)]
    pub neurologist_name: String,
    /// Free-text medication names kept alongside the structured list
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub other_conditions: String,
    #[serde(default)]
    pub emergency_contact: String,
    #[serde(default)]
    pub notes: String,
}

impl SubjectProfile {
    /// "First Last", trimmed when either part is empty
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_slot_enumeration_is_complete_and_ordered() {
        let slots: Vec<TimeSlot> = TimeSlot::all().collect();
        assert_eq!(slots.len(), SLOTS_PER_DAY);
        assert_eq!(slots[0].label(), "00:00");
        assert_eq!(slots[1].label(), "00:30");
        assert_eq!(slots[47].label(), "23:30");

        for (index, slot) in slots.iter().enumerate() {
            assert_eq!(slot.index(), index);
        }
        for pair in slots.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_slot_parse_valid_labels() {
        assert_eq!(
            TimeSlot::parse("09:00"),
            Some(TimeSlot {
                hour: 9,
                second_half: false
            })
        );
        assert_eq!(
            TimeSlot::parse("09:30"),
            Some(TimeSlot {
                hour: 9,
                second_half: true
            })
        );
        // Any in-range minute maps to its half
        assert_eq!(
            TimeSlot::parse("14:05"),
            Some(TimeSlot {
                hour: 14,
                second_half: false
            })
        );
        assert_eq!(
            TimeSlot::parse("14:45"),
            Some(TimeSlot {
                hour: 14,
                second_half: true
            })
        );
    }

    #[test]
    fn test_slot_parse_rejects_malformed_labels() {
        assert_eq!(TimeSlot::parse(""), None);
        assert_eq!(TimeSlot::parse("nine"), None);
        assert_eq!(TimeSlot::parse("09"), None);
        assert_eq!(TimeSlot::parse("xx:30"), None);
        assert_eq!(TimeSlot::parse("09:yy"), None);
        assert_eq!(TimeSlot::parse("24:00"), None);
        assert_eq!(TimeSlot::parse("10:60"), None);
        assert_eq!(TimeSlot::parse("-1:00"), None);
    }

    #[test]
    fn test_minute_thirty_belongs_to_second_half() {
        let first = TimeSlot {
            hour: 11,
            second_half: false,
        };
        let second = TimeSlot {
            hour: 11,
            second_half: true,
        };
        assert!(!first.contains_wall_clock(11, 30));
        assert!(second.contains_wall_clock(11, 30));
        assert!(first.contains_wall_clock(11, 29));
        assert!(second.contains_wall_clock(11, 59));
        assert!(!second.contains_wall_clock(12, 30));
    }

    #[test]
    fn test_slot_serializes_as_label() {
        let slot = TimeSlot {
            hour: 7,
            second_half: true,
        };
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, "\"07:30\"");

        let parsed: TimeSlot = serde_json::from_str("\"23:00\"").unwrap();
        assert_eq!(
            parsed,
            TimeSlot {
                hour: 23,
                second_half: false
            }
        );
        assert!(serde_json::from_str::<TimeSlot>("\"25:00\"").is_err());
    }

    #[test]
    fn test_window_edges_are_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let window = Window::default_trailing(now);

        // Exactly 28 days ago is in; one second older is out
        let edge = now - Duration::days(28);
        assert!(window.contains(edge));
        assert!(!window.contains(edge - Duration::seconds(1)));

        // 27 days 23h 59m ago is comfortably inside
        let inside = now - Duration::days(27) - Duration::hours(23) - Duration::minutes(59);
        assert!(window.contains(inside));

        // The captured "now" is in; anything newer is out
        assert!(window.contains(now));
        assert!(!window.contains(now + Duration::seconds(1)));

        assert_eq!(window.days(), 28);
    }

    #[test]
    fn test_state_wire_tags() {
        assert_eq!(
            serde_json::to_string(&SymptomState::Dyskinesia).unwrap(),
            "\"dys\""
        );
        assert_eq!(
            serde_json::to_string(&SymptomState::Tremor).unwrap(),
            "\"trem\""
        );

        // Long-form aliases accepted on input
        let state: SymptomState = serde_json::from_str("\"dyskinesia\"").unwrap();
        assert_eq!(state, SymptomState::Dyskinesia);
        let state: SymptomState = serde_json::from_str("\"tremor\"").unwrap();
        assert_eq!(state, SymptomState::Tremor);
    }

    #[test]
    fn test_state_from_str() {
        assert_eq!("on".parse::<SymptomState>().unwrap(), SymptomState::On);
        assert_eq!(
            "dyskinesia".parse::<SymptomState>().unwrap(),
            SymptomState::Dyskinesia
        );
        assert!("wobbly".parse::<SymptomState>().is_err());
    }

    #[test]
    fn test_medication_times_sorted_and_unique() {
        let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let twenty = NaiveTime::from_hms_opt(20, 0, 0).unwrap();

        let medication = Medication::new("Levodopa", 1.5, vec![twenty, eight, noon, eight]);
        assert_eq!(medication.scheduled_times, vec![eight, noon, twenty]);
    }

    #[test]
    fn test_subject_full_name_trims_empty_parts() {
        let mut subject = SubjectProfile::default();
        assert_eq!(subject.full_name(), "");

        subject.first_name = "Ada".to_string();
        assert_eq!(subject.full_name(), "Ada");

        subject.last_name = "Lovelace".to_string();
        assert_eq!(subject.full_name(), "Ada Lovelace");
    }
}
