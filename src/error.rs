use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Invalid time \"{input}\" (expected HH:MM)")]
    InvalidTime { input: String },

    #[error("Invalid amount \"{input}\" (expected a number such as 120000, 120,000 or 12.5만)")]
    InvalidAmount { input: String },

    #[error("Invalid day start hour {hour} (expected 0-23)")]
    InvalidDayStartHour { hour: u32 },

    #[error("Invalid month {month} (expected 1-12)")]
    InvalidMonth { month: u32 },

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("No record with id {id}")]
    RecordNotFound { id: i64 },

    #[error("Both pickup and drop-off names are required")]
    MissingLocationName,

    #[error("Transport records need a distance greater than 0 km")]
    MissingDistance,

    #[error("Line {line} did not produce a pickup/drop-off proposal")]
    NoProposal { line: usize },

    #[error("No text to parse")]
    EmptyInput,

    #[error("Failed to encode JSON output: {0}")]
    Encode(serde_json::Error),

    #[error("{0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not a valid haulbook data file: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode data: {0}")]
    Serialize(serde_json::Error),
}
