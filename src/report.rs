//! Report assembly
//!
//! This module packages the engine's output into the presentation-ready
//! payload shared by the chart, PDF, and on-screen renderers: subject header
//! facts, severity-tagged summary lines, the three 48-point series, and the
//! medication listing.
//!
//! Pure data shaping. No statistic is recomputed here, and no summary line is
//! fabricated that the engine did not derive; presence rules mirror the
//! summary's emission rules exactly.

use crate::types::{DailyProfile, DailySummary, Medication, Severity, SubjectProfile, TimeSlot};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Producer metadata stamped on every report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
}

/// Subject facts for the report header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectHeader {
    pub full_name: String,
    /// Whole years between birth date and generation date, when known
    pub age_years: Option<u32>,
    pub diagnosis_year: Option<i32>,
}

/// One severity-tagged summary line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub text: String,
    pub severity: Severity,
}

/// Which engine series a chart series carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Signed on/off balance ratio per slot
    Balance,
    /// Dyskinesia occurrences per slot
    Dyskinesia,
    /// Tremor occurrences per slot
    Tremor,
}

/// One point of a 48-point series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub slot: TimeSlot,
    pub value: f64,
}

/// A labeled 48-point data series, unmodified from the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub kind: SeriesKind,
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

/// The assembled report, handed to rendering collaborators as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub producer: ReportProducer,
    pub subject: SubjectHeader,
    /// Up to three lines, in the summary's fixed order
    pub summary: Vec<SummaryLine>,
    /// Balance, dyskinesia, tremor series, in that order
    pub series: Vec<ChartSeries>,
    /// Medication list passed through verbatim
    pub medications: Vec<Medication>,
}

/// Report assembler
pub struct ReportAssembler;

impl ReportAssembler {
    /// Assemble the report payload from the engine output and the
    /// display-only collaborator data.
    ///
    /// `generated_at` should be the same captured instant the profile was
    /// computed with.
    pub fn assemble(
        profile: &DailyProfile,
        summary: &DailySummary,
        medications: &[Medication],
        subject: &SubjectProfile,
        generated_at: DateTime<Utc>,
    ) -> ReportPayload {
        let age_years = subject
            .birth_date
            .and_then(|birth| generated_at.date_naive().years_since(birth));

        let summary_lines = summary
            .insights
            .iter()
            .map(|insight| SummaryLine {
                text: insight.headline(),
                severity: insight.severity(),
            })
            .collect();

        ReportPayload {
            title: format!("Symptom state report: last {} days", profile.window.days()),
            generated_at,
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
            },
            subject: SubjectHeader {
                full_name: subject.full_name(),
                age_years,
                diagnosis_year: subject.diagnosis_year,
            },
            summary: summary_lines,
            series: build_series(profile),
            medications: medications.to_vec(),
        }
    }
}

fn build_series(profile: &DailyProfile) -> Vec<ChartSeries> {
    let balance = profile
        .entries
        .iter()
        .map(|entry| SeriesPoint {
            slot: entry.slot,
            value: entry.stats.balance_ratio,
        })
        .collect();
    let dyskinesia = profile
        .entries
        .iter()
        .map(|entry| SeriesPoint {
            slot: entry.slot,
            value: f64::from(entry.stats.dyskinesia_count),
        })
        .collect();
    let tremor = profile
        .entries
        .iter()
        .map(|entry| SeriesPoint {
            slot: entry.slot,
            value: f64::from(entry.stats.tremor_count),
        })
        .collect();

    vec![
        ChartSeries {
            kind: SeriesKind::Balance,
            label: "On/off balance".to_string(),
            points: balance,
        },
        ChartSeries {
            kind: SeriesKind::Dyskinesia,
            label: "Dyskinesia".to_string(),
            points: dyskinesia,
        },
        ChartSeries {
            kind: SeriesKind::Tremor,
            label: "Tremor".to_string(),
            points: tremor,
        },
    ]
}
