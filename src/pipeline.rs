//! Pipeline orchestration
//!
//! This module provides the public API for Motor Diary. It runs the full
//! pipeline from a raw event snapshot to the assembled report: trailing
//! window formation → slot aggregation → summary derivation → report
//! assembly. The evaluation instant is captured once per call and shared by
//! every stage, so one report is internally consistent.

use crate::aggregate::SlotAggregator;
use crate::log::EventLog;
use crate::medication::MedicationList;
use crate::report::{ReportAssembler, ReportPayload};
use crate::summary::daily_summary;
use crate::types::{DailySummary, Medication, SubjectProfile, SymptomEvent, SymptomState};
use chrono::{DateTime, Utc};

/// Run the full pipeline over an event snapshot with default settings.
///
/// # Arguments
/// * `events` - Immutable snapshot of the event log (unordered)
/// * `medications` - Medication list for the report's display section
/// * `subject` - Subject metadata for the report header
/// * `now` - Evaluation instant; forms the trailing 28-day window
///
/// # Example
/// ```ignore
/// let report = events_to_report(&log.snapshot(), &[], &subject, Utc::now());
/// ```
pub fn events_to_report(
    events: &[SymptomEvent],
    medications: &[Medication],
    subject: &SubjectProfile,
    now: DateTime<Utc>,
) -> ReportPayload {
    let aggregator = SlotAggregator::new();
    let profile = aggregator.daily_profile_at(events, now);
    let summary = daily_summary(&profile);
    ReportAssembler::assemble(&profile, &summary, medications, subject, now)
}

/// Stateful diary owning the recording collaborators.
///
/// Use this when the embedding application wants one object to record taps
/// into, maintain the medication list on, and ask for reports from. Each
/// report call works on a snapshot captured at entry, so recording can
/// continue concurrently with rendering.
#[derive(Debug, Clone, Default)]
pub struct Diary {
    log: EventLog,
    medications: MedicationList,
    subject: SubjectProfile,
    aggregator: SlotAggregator,
}

impl Diary {
    /// Create an empty diary with default aggregation settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a diary with a custom aggregator (window length, offset)
    pub fn with_aggregator(aggregator: SlotAggregator) -> Self {
        Self {
            aggregator,
            ..Self::default()
        }
    }

    /// Record a tap at the current instant
    pub fn record(&mut self, state: SymptomState) {
        self.log.record(state);
    }

    /// Record a tap at an explicit instant
    pub fn record_at(&mut self, state: SymptomState, timestamp: DateTime<Utc>) {
        self.log.record_at(state, timestamp);
    }

    /// Clear the entire event log
    pub fn reset_all(&mut self) {
        self.log.reset_all();
    }

    /// The event log
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// The medication list
    pub fn medications(&self) -> &MedicationList {
        &self.medications
    }

    /// Mutable access to the medication list
    pub fn medications_mut(&mut self) -> &mut MedicationList {
        &mut self.medications
    }

    /// The subject profile
    pub fn subject(&self) -> &SubjectProfile {
        &self.subject
    }

    /// Replace the subject profile
    pub fn set_subject(&mut self, subject: SubjectProfile) {
        self.subject = subject;
    }

    /// Derive the summary insights for the window ending at `now`
    pub fn summary_at(&self, now: DateTime<Utc>) -> DailySummary {
        let profile = self.aggregator.daily_profile_at(self.log.entries(), now);
        daily_summary(&profile)
    }

    /// Assemble the full report for the window ending at `now`
    pub fn report_at(&self, now: DateTime<Utc>) -> ReportPayload {
        let profile = self.aggregator.daily_profile_at(self.log.entries(), now);
        let summary = daily_summary(&profile);
        ReportAssembler::assemble(
            &profile,
            &summary,
            self.medications.medications(),
            &self.subject,
            now,
        )
    }

    /// Load the event log from its JSON snapshot
    pub fn load_log(&mut self, json: &str) -> Result<(), crate::DiaryError> {
        self.log = EventLog::from_json(json)?;
        Ok(())
    }

    /// Serialize the event log to its JSON snapshot
    pub fn save_log(&self) -> Result<String, crate::DiaryError> {
        Ok(self.log.to_json()?)
    }

    /// Load the medication list from its JSON snapshot
    pub fn load_medications(&mut self, json: &str) -> Result<(), crate::DiaryError> {
        self.medications = MedicationList::from_json(json)?;
        Ok(())
    }

    /// Serialize the medication list to its JSON snapshot
    pub fn save_medications(&self) -> Result<String, crate::DiaryError> {
        Ok(self.medications.to_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InsightKind;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap()
    }

    fn event_at(state: SymptomState, days_ago: i64, hour: u32, minute: u32) -> SymptomEvent {
        let day = (now() - Duration::days(days_ago)).date_naive();
        let timestamp = day.and_hms_opt(hour, minute, 0).unwrap().and_utc();
        SymptomEvent::new(state, timestamp)
    }

    #[test]
    fn test_events_to_report_end_to_end() {
        let events = vec![
            event_at(SymptomState::On, 1, 14, 5),
            event_at(SymptomState::On, 2, 14, 10),
            event_at(SymptomState::Off, 1, 17, 45),
            event_at(SymptomState::Dyskinesia, 3, 12, 30),
        ];
        let report = events_to_report(&events, &[], &SubjectProfile::default(), now());

        assert_eq!(report.summary.len(), 3);
        assert_eq!(report.summary[0].text, "Best period: 14h (100% on)");
        assert_eq!(report.series[0].points[28].value, 100.0);
        assert_eq!(report.series[1].points[25].value, 1.0);
        assert!(report.medications.is_empty());
    }

    #[test]
    fn test_diary_record_and_report() {
        let mut diary = Diary::new();
        diary.record_at(SymptomState::On, now() - Duration::days(1));
        diary.record_at(SymptomState::On, now() - Duration::days(2));

        let report = diary.report_at(now());
        let best = &report.summary[0];
        assert!(best.text.starts_with("Best period"));

        let summary = diary.summary_at(now());
        assert_eq!(summary.insights[0].kind, InsightKind::BestPeriod);
    }

    #[test]
    fn test_diary_reset_clears_report_content() {
        let mut diary = Diary::new();
        diary.record_at(SymptomState::Off, now() - Duration::days(1));
        assert_eq!(diary.report_at(now()).summary.len(), 1);

        diary.reset_all();
        let report = diary.report_at(now());
        assert!(report.summary.is_empty());
        assert!(report
            .series
            .iter()
            .all(|series| series.points.iter().all(|point| point.value == 0.0)));
    }

    #[test]
    fn test_diary_log_round_trip() {
        let mut diary = Diary::new();
        diary.record_at(SymptomState::Tremor, now() - Duration::days(1));

        let saved = diary.save_log().unwrap();
        let mut restored = Diary::new();
        restored.load_log(&saved).unwrap();

        assert_eq!(restored.log().entries(), diary.log().entries());
    }

    #[test]
    fn test_report_only_sees_the_window() {
        let mut diary = Diary::new();
        diary.record_at(SymptomState::Off, now() - Duration::days(40));
        diary.record_at(SymptomState::On, now() - Duration::days(1));

        let report = diary.report_at(now());
        // The 40-day-old off tap is outside the window; only the on remains
        assert_eq!(report.summary[0].severity, crate::types::Severity::Favorable);
        assert!(report
            .summary
            .iter()
            .all(|line| line.severity != crate::types::Severity::Unfavorable));
    }
}
