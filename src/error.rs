use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Failed to read {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    ParseInput {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{var} is not set. Export an API key before running a collection.")]
    MissingApiKey { var: String },

    #[error("Concept list is empty")]
    NoConcepts,

    #[error("{0}")]
    Persistence(#[from] PersistenceError),
}

/// Failure to load or save persisted state (fetch record or quota ledger).
#[derive(Debug, Error)]
pub(crate) enum PersistenceError {
    #[error("Failed to read state file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write state file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt state file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid last-fetch value \"{value}\" for concept \"{concept}\"")]
    InvalidDate { concept: String, value: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Failure of a single data-source call. Recovered by the runner.
#[derive(Debug, Error)]
pub(crate) enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Server returned status {status}")]
    Status { status: u16 },

    #[error("Rate limited by the remote API")]
    RateLimited,

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub(crate) enum OutputError {
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
