//! Error types for the stride_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for stride_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pace string was not of the form `M:SS`
    #[error("Invalid pace '{0}': expected minutes:seconds, e.g. 4:30")]
    PaceParse(String),

    /// Margin would make the fastest bound zero or negative
    #[error("Margin of {margin_sec}s is not smaller than the pace itself ({pace_sec}s/km)")]
    DegenerateMargin { pace_sec: u32, margin_sec: u32 },

    /// Plan document is structurally unusable
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    /// Schedule date could not be parsed
    #[error("Invalid schedule date '{0}': expected YYYY-MM-DD")]
    ScheduleDate(String),

    /// The remote platform rejected or failed a request
    #[error("Platform error: {0}")]
    Platform(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
