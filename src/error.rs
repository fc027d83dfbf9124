//! Error types for Motor Diary

use thiserror::Error;

/// Errors that can occur at the input boundary.
///
/// The aggregation engine itself is total: malformed slot labels and empty
/// logs degrade to zero statistics rather than failing. Errors only arise
/// when decoding external JSON or CLI input.
#[derive(Debug, Error)]
pub enum DiaryError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown symptom state: {0}")]
    UnknownState(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Failed to parse input: {0}")]
    ParseError(String),
}
