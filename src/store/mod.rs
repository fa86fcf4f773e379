//! Fetch-record persistence
//!
//! The schedule tracker only sees a [`FetchRecord`]; where it lives between
//! runs is decided here.

mod json;
mod ledger;
mod sqlite;

use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;

use crate::consts::{FETCH_RECORD_JSON, FETCH_RECORD_SQLITE};
use crate::core::FetchRecord;
use crate::error::PersistenceError;

pub(crate) use json::JsonFetchStore;
pub(crate) use ledger::QuotaLedger;
pub(crate) use sqlite::SqliteFetchStore;

/// Load/save contract for the fetch record
pub(crate) trait FetchStore {
    /// Returns an empty record when nothing has been stored yet.
    fn load(&self) -> Result<FetchRecord, PersistenceError>;

    /// Persist the full mapping, replacing what was stored.
    fn save(&self, record: &FetchRecord) -> Result<(), PersistenceError>;

    /// Human-readable location for log lines
    fn location(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StoreKind {
    /// JSON file compatible with last_fetch.json (default)
    #[default]
    Json,
    /// Embedded SQLite database
    Sqlite,
}

pub(crate) fn open_store(kind: StoreKind, state_dir: &Path) -> Box<dyn FetchStore> {
    match kind {
        StoreKind::Json => Box::new(JsonFetchStore::new(state_dir.join(FETCH_RECORD_JSON))),
        StoreKind::Sqlite => Box::new(SqliteFetchStore::new(state_dir.join(FETCH_RECORD_SQLITE))),
    }
}
