//! Motor Diary - On-device compute engine for movement-disorder symptom profiles
//!
//! Motor Diary turns a raw log of timestamped symptom taps into a fixed-resolution
//! daily profile through a deterministic pipeline: windowed filtering → half-hour
//! slot aggregation → summary insight derivation → report assembly.
//!
//! ## Modules
//!
//! - **Aggregation**: Partition a trailing window of events into the 48 half-hour
//!   slots of a day and compute per-slot statistics
//! - **Summary**: Derive the best-period / hardest-period / daily-average insights
//! - **Report**: Assemble the presentation-ready payload consumed by chart, PDF,
//!   and on-screen renderers
//! - **Recording**: Append-only event log and medication list collaborators

pub mod aggregate;
pub mod error;
pub mod log;
pub mod medication;
pub mod pipeline;
pub mod report;
pub mod summary;
pub mod types;

pub use aggregate::SlotAggregator;
pub use error::DiaryError;
pub use log::EventLog;
pub use medication::MedicationList;
pub use pipeline::{events_to_report, Diary};
pub use report::{ReportAssembler, ReportPayload};
pub use summary::daily_summary;
pub use types::{
    DailyProfile, DailySummary, Insight, Medication, Severity, SlotStatistics, SubjectProfile,
    SymptomEvent, SymptomState, TimeSlot, Window,
};

/// Engine version embedded in all report payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "motor-diary";
