use std::path::PathBuf;
use thiserror::Error;

/// Fatal ingestion failures. Every other anomaly in a CSV export is
/// defaulted silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// Fewer than two lines (header plus one data row).
    #[error("CSV file appears to be empty")]
    EmptyInput,

    /// Every data row had the wrong number of fields.
    #[error("No valid data rows found in CSV")]
    NoValidRows,

    /// No header matched any of the team/division synonyms.
    #[error("Could not find team/division column in CSV")]
    MissingRequiredColumn,
}

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}
