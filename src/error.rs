use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Unknown job: {name}")]
    UnknownJob { name: String },

    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{0}")]
    Aggregate(#[from] AggregateError),
}

/// Failure of a single HTTP exchange
#[derive(Debug, Error)]
pub(crate) enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Failed to read response body: {0}")]
    Body(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("Invalid login response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Login response has no session id ({message})")]
    MissingToken { message: String },
}

#[derive(Debug, Error)]
pub(crate) enum QueryError {
    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("Failed to decode JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Query response is missing {field}")]
    MissingField { field: &'static str },

    #[error("Query service returned status {status}: {message}")]
    Service { status: String, message: String },
}

#[derive(Debug, Error)]
pub(crate) enum WriteError {
    #[error("Failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Unparseable value \"{value}\" in column {column} (expected DDMMYYYY HH:MM:SS)")]
    DateValue { column: String, value: String },
}

#[derive(Debug, Error)]
pub(crate) enum AggregateError {
    #[error("Invalid pattern \"{pattern}\": {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("No files match {pattern}")]
    NoInputs { pattern: String },

    #[error("Header of {} does not match {}", path.display(), first.display())]
    HeaderMismatch { path: PathBuf, first: PathBuf },

    #[error("CSV error in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
