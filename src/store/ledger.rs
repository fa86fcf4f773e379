//! Daily quota usage ledger
//!
//! Units charged per quota day, kept for reporting. It never feeds back into
//! a run's ceiling.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct QuotaLedger {
    days: BTreeMap<String, u64>,
}

impl QuotaLedger {
    pub(crate) fn load(path: &Path) -> Result<Self, PersistenceError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let days = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            PersistenceError::Corrupt {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(Self { days })
    }

    pub(crate) fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let write_err = |source| PersistenceError::Write {
            path: PathBuf::from(path),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let body = serde_json::to_vec_pretty(&self.days).map_err(|e| write_err(e.into()))?;
        fs::write(path, body).map_err(write_err)
    }

    /// Add `units` to `day` and return that day's total.
    pub(crate) fn add(&mut self, day: &str, units: u64) -> u64 {
        let total = self.days.entry(day.to_string()).or_insert(0);
        *total = total.saturating_add(units);
        *total
    }

    pub(crate) fn days(&self) -> &BTreeMap<String, u64> {
        &self.days
    }
}
