use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::PathBuf;

use crate::core::FetchRecord;
use crate::error::PersistenceError;
use crate::utils::{format_date, parse_record_date};

use super::FetchStore;

/// Fetch record kept as a pretty-printed JSON object of label -> date
#[derive(Debug, Clone)]
pub(crate) struct JsonFetchStore {
    path: PathBuf,
}

impl JsonFetchStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl FetchStore for JsonFetchStore {
    fn load(&self) -> Result<FetchRecord, PersistenceError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FetchRecord::new()),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let raw: BTreeMap<String, String> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| PersistenceError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        raw.into_iter()
            .map(|(concept, value)| match parse_record_date(&value) {
                Some(date) => Ok((concept, date)),
                None => Err(PersistenceError::InvalidDate { concept, value }),
            })
            .collect()
    }

    fn save(&self, record: &FetchRecord) -> Result<(), PersistenceError> {
        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let raw: BTreeMap<&str, String> = record
            .iter()
            .map(|(concept, date)| (concept.as_str(), format_date(*date)))
            .collect();
        let body = serde_json::to_vec_pretty(&raw).map_err(|e| write_err(e.into()))?;

        // Write beside the target and rename so a crash never leaves a torn file
        let tmp = self.temp_path();
        let mut file = File::create(&tmp).map_err(write_err)?;
        file.write_all(&body).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(write_err)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
